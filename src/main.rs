//! hlview-render - render a document with its highlights to PNG
//!
//! Usage:
//!   hlview-render image --input scan.png --words words.json --out out.png
//!   hlview-render pdf --input doc.pdf --highlights hl.json --out-dir pages/

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use clap::{Args, Parser, Subcommand};
    use hlview::hlview_canvas::{Color, PixmapFactory};
    use hlview::{
        AnnotationRegion, ImageViewer, LogLevel, SurfaceGeometry, ViewerConfig, decode_document,
        parse_regions,
    };

    #[derive(Parser)]
    #[command(name = "hlview-render", version, about = "Render highlight overlays to PNG")]
    struct Cli {
        /// Configuration file (defaults to the user config directory)
        #[arg(long, global = true)]
        config: Option<PathBuf>,

        /// Log level: error, warn, info, debug, trace
        #[arg(long, global = true)]
        log_level: Option<LogLevel>,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Render an image with outlined word boxes
        Image(ImageArgs),
        /// Render every PDF page with filled highlights
        Pdf(PdfArgs),
    }

    #[derive(Args)]
    struct ImageArgs {
        #[arg(long)]
        input: PathBuf,
        /// JSON array of regions
        #[arg(long)]
        words: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Container size as WxH
        #[arg(long, value_parser = parse_size)]
        container: Option<(f32, f32)>,
        /// Zoom steps; negative zooms out
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        zoom: i32,
        /// Pan offset as DX,DY in screen pixels
        #[arg(long, value_parser = parse_pan, allow_hyphen_values = true)]
        pan: Option<(f32, f32)>,
        /// Input file holds base64 text instead of raw bytes
        #[arg(long)]
        base64: bool,
    }

    #[derive(Args)]
    struct PdfArgs {
        #[arg(long)]
        input: PathBuf,
        /// JSON array of regions with page numbers
        #[arg(long)]
        highlights: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
        /// Zoom steps; negative zooms out
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        zoom: i32,
        /// Input file holds base64 text instead of raw bytes
        #[arg(long)]
        base64: bool,
    }

    fn parse_pair(s: &str, sep: char) -> Result<(f32, f32), String> {
        let (a, b) = s
            .split_once(sep)
            .ok_or_else(|| format!("expected two numbers separated by '{}'", sep))?;
        let a = a.trim().parse().map_err(|e| format!("{}: {}", a, e))?;
        let b = b.trim().parse().map_err(|e| format!("{}: {}", b, e))?;
        Ok((a, b))
    }

    fn parse_size(s: &str) -> Result<(f32, f32), String> {
        let (w, h) = parse_pair(s, 'x')?;
        if w <= 0.0 || h <= 0.0 {
            return Err(format!("container must be positive, got {}", s));
        }
        Ok((w, h))
    }

    fn parse_pan(s: &str) -> Result<(f32, f32), String> {
        parse_pair(s, ',')
    }

    fn load_config(path: Option<&Path>) -> Result<ViewerConfig> {
        match path {
            Some(path) => ViewerConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config: {}", path.display())),
            None => Ok(ViewerConfig::load_from_default_path().unwrap_or_default()),
        }
    }

    fn read_document(path: &Path, base64: bool) -> Result<Option<Vec<u8>>> {
        if base64 {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(decode_document(&text)?)
        } else {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Ok((!bytes.is_empty()).then_some(bytes))
        }
    }

    fn read_regions(path: &Path) -> Result<Vec<AnnotationRegion>> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        parse_regions(&json).with_context(|| format!("Invalid region list: {}", path.display()))
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        let config = load_config(cli.config.as_deref())?;

        let level = cli.log_level.unwrap_or(config.log_level);
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(level.to_level_filter())
            .init();

        match cli.command {
            Command::Image(args) => render_image(&config, &args),
            Command::Pdf(args) => render_pdf(&config, &args),
        }
    }

    fn render_image(config: &ViewerConfig, args: &ImageArgs) -> Result<()> {
        let document = read_document(&args.input, args.base64)?;
        let regions = read_regions(&args.words)?;

        let container = args
            .container
            .map(|(w, h)| SurfaceGeometry::new(w, h))
            .unwrap_or_else(|| config.image.default_container_geometry());
        let mut viewer = ImageViewer::with_container(config.image.clone(), container)
            .with_background(Color::CANVAS_GRAY);

        let outcome = viewer
            .set_inputs(document.as_deref(), &regions)
            .with_context(|| format!("Failed to render {}", args.input.display()))?;
        for _ in 0..args.zoom.unsigned_abs() {
            if args.zoom > 0 {
                viewer.zoom_in();
            } else {
                viewer.zoom_out();
            }
        }
        if let Some((dx, dy)) = args.pan {
            viewer.pan_by(dx, dy);
        }

        let surface = viewer.compose(&mut PixmapFactory::new())?;
        surface
            .save_png(&args.out)
            .with_context(|| format!("Failed to write {}", args.out.display()))?;
        log::info!(
            "{:?} at {}% -> {}",
            outcome,
            viewer.zoom_percent(),
            args.out.display()
        );
        Ok(())
    }

    #[cfg(feature = "pdfium")]
    fn render_pdf(config: &ViewerConfig, args: &PdfArgs) -> Result<()> {
        use hlview::PdfViewer;
        use hlview::hlview_canvas::PixmapSurface;
        use hlview::render::PdfiumBackend;

        let document = read_document(&args.input, args.base64)?;
        let regions = read_regions(&args.highlights)?;
        let backend = PdfiumBackend::new()?;

        let mut viewer: PdfViewer<PixmapSurface> = PdfViewer::new(config.pdf.clone());
        for _ in 0..args.zoom.unsigned_abs() {
            if args.zoom > 0 {
                viewer.zoom_in();
            } else {
                viewer.zoom_out();
            }
        }

        let pass = viewer.begin_pass(&regions);
        let mut factory = PixmapFactory::new().with_background(Color::WHITE);
        let outcome = pollster::block_on(pass.run(document.as_deref(), &backend, &mut factory))
            .with_context(|| format!("Failed to render {}", args.input.display()))?;

        let out_dir = &args.out_dir;
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;
        for page in viewer.pages().pages() {
            let path = out_dir.join(format!("page-{:03}.png", page.page.get()));
            page.surface
                .save_png(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        log::info!(
            "{:?}: {} of {} pages written to {}",
            outcome,
            viewer.pages().len(),
            viewer.page_count(),
            out_dir.display()
        );
        Ok(())
    }

    #[cfg(not(feature = "pdfium"))]
    fn render_pdf(_config: &ViewerConfig, _args: &PdfArgs) -> Result<()> {
        anyhow::bail!("PDF rendering needs hlview-render built with the `pdfium` feature")
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    cli::run()
}

// WASM doesn't use main(), the library's start function runs instead
#[cfg(target_arch = "wasm32")]
fn main() {}
