mod logger;
mod viewer;

use anyhow::{Context, Result, bail};
use cfv_async_runtime::{DocumentId, PageRange, ViewerCommand, ViewerConfig, ViewerUpdate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logger::CliLogger;
use crate::viewer::Viewer;

#[derive(Parser)]
#[command(name = "cfv", about = "Custom file viewer CLI", version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Viewer configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap a file in a container
    Encode {
        /// File to wrap
        #[arg(short, long)]
        input: PathBuf,

        /// Container file to write
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract the wrapped file from a container
    Decode {
        /// Container file
        #[arg(short, long)]
        input: PathBuf,

        /// Directory to extract into (defaults to the configured scratch directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Show container metadata
    Info {
        /// Container file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a container's pages and report their sizes
    Pages {
        /// Container file
        #[arg(short, long)]
        input: PathBuf,

        /// Render resolution (defaults to the rasterizer's native resolution)
        #[arg(long)]
        dpi: Option<u32>,

        /// Save the display-sized pages as PNG files in this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Print a container's pages to a PDF file
    Print {
        /// Container file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// First page to print (1-based, defaults to the first page)
        #[arg(long)]
        from: Option<i64>,

        /// Last page to print (1-based, defaults to the last page)
        #[arg(long)]
        to: Option<i64>,

        /// Output paper size
        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Output orientation
        #[arg(long, default_value = "portrait", value_enum)]
        orientation: OrientationArg,

        /// Leave the watermark off the printed sheets
        #[arg(long)]
        no_watermark: bool,
    },

    /// Name the paper size for a page size in centimeters
    Classify {
        width_cm: f32,
        height_cm: f32,
    },

    /// List known paper sizes
    Sizes,

    /// Write the default configuration to a file
    InitConfig {
        /// Configuration file to write
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    A6,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl PaperArg {
    fn label(self) -> &'static str {
        match self {
            PaperArg::A3 => "A3",
            PaperArg::A4 => "A4",
            PaperArg::A5 => "A5",
            PaperArg::A6 => "A6",
            PaperArg::Letter => "Letter",
            PaperArg::Legal => "Legal",
        }
    }
}

async fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    let config = match path {
        Some(path) => ViewerConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Convert 1-based CLI page numbers to a 0-based range
fn page_range(from: Option<i64>, to: Option<i64>) -> PageRange {
    PageRange::new(from.map(|p| p - 1), to.map(|p| p - 1))
}

async fn open(viewer: &mut Viewer, input: PathBuf) -> Result<(DocumentId, usize)> {
    match viewer
        .request(ViewerCommand::Open {
            container_path: input,
        })
        .await?
    {
        ViewerUpdate::Opened {
            doc_id, page_count, ..
        } => Ok((doc_id, page_count)),
        other => bail!("unexpected reply to open: {:?}", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Encode { input, output } => {
            let metadata = cfv_container::encode(&input, &output)?;
            println!(
                "Encoded {} ({}) → {}",
                metadata.file_name,
                metadata.original_type,
                output.display()
            );
        }

        Commands::Decode { input, out_dir } => {
            let out_dir = match out_dir {
                Some(dir) => dir,
                None => load_config(cli.config.as_ref()).await?.scratch_dir,
            };
            let container = cfv_container::decode(&input)?;
            let path = cfv_container::extract_payload(&container, &out_dir)?;
            println!(
                "Extracted {} bytes → {}",
                container.payload.len(),
                path.display()
            );
        }

        Commands::Info { input, json } => {
            let container = cfv_container::decode(&input)?;
            let metadata = &container.metadata;
            if json {
                println!("{}", serde_json::to_string_pretty(metadata)?);
                return Ok(());
            }
            println!("File name: {}", metadata.file_name);
            println!("Type: {}", metadata.original_type);
            println!("Payload: {} bytes", container.payload.len());
            if let Some(orientation) = metadata.orientation {
                println!("Orientation: {}", orientation.name());
            }
            if let Some((width_cm, height_cm)) = metadata.page_size_cm() {
                println!("{}", cfv_render::describe_size(width_cm, height_cm));
            }
            if let Some(author) = metadata.author.as_deref().filter(|a| !a.is_empty()) {
                println!("Author: {}", author);
            }
            if let Some(date) = metadata.creation_date.as_deref().filter(|d| !d.is_empty()) {
                println!("Created: {}", date);
            }
            for (key, value) in &metadata.extra {
                println!("{}: {}", key, value);
            }
        }

        Commands::Pages {
            input,
            dpi,
            export_dir,
        } => {
            let config = load_config(cli.config.as_ref()).await?;
            let mut viewer = Viewer::start(config);
            let (doc_id, page_count) = open(&mut viewer, input).await?;

            let (pages, skipped, watermark) = match viewer
                .request(ViewerCommand::RenderPages { doc_id, dpi })
                .await?
            {
                ViewerUpdate::PagesRendered {
                    pages,
                    skipped,
                    watermark,
                    ..
                } => (pages, skipped, watermark),
                other => bail!("unexpected reply to render: {:?}", other),
            };

            if let Some(dir) = &export_dir {
                std::fs::create_dir_all(dir)?;
            }
            for page in &pages {
                let (width, height) = page.image.dimensions();
                println!(
                    "{}: {}x{} px, {}",
                    page.title, width, height, page.size_label
                );
                if let Some(dir) = &export_dir {
                    let path = dir.join(format!("page-{:03}.png", page.page_number));
                    page.image
                        .save(&path)
                        .with_context(|| format!("saving {}", path.display()))?;
                }
            }
            for failure in &skipped {
                println!("Page {}: skipped ({})", failure.index + 1, failure.reason);
            }
            println!("Rendered {} of {} pages", pages.len(), page_count);
            if let Some(watermark) = watermark {
                println!("Watermark: {}", watermark.text);
            }

            viewer.shutdown().await?;
        }

        Commands::Print {
            input,
            output,
            from,
            to,
            paper,
            orientation,
            no_watermark,
        } => {
            let mut config = load_config(cli.config.as_ref()).await?;
            if let Some(paper) = paper {
                config.render.print_surface =
                    cfv_render::PrintSurface::from_paper_label(paper.label())
                        .with_context(|| format!("unknown paper size {}", paper.label()))?;
            }
            if let OrientationArg::Landscape = orientation {
                config.render.print_surface = config.render.print_surface.landscape();
            }
            if no_watermark {
                config.features.watermark = false;
            }

            let mut viewer = Viewer::start(config);
            let (doc_id, _) = open(&mut viewer, input).await?;
            let (path, sheet_count, skipped) = match viewer
                .request(ViewerCommand::Print {
                    doc_id,
                    range: page_range(from, to),
                    output_path: output,
                })
                .await?
            {
                ViewerUpdate::Printed {
                    path,
                    sheet_count,
                    skipped,
                    ..
                } => (path, sheet_count, skipped),
                other => bail!("unexpected reply to print: {:?}", other),
            };

            for failure in &skipped {
                println!("Page {}: skipped ({})", failure.index + 1, failure.reason);
            }
            println!("Printed {} sheet(s) → {}", sheet_count, path.display());

            viewer.shutdown().await?;
        }

        Commands::Classify {
            width_cm,
            height_cm,
        } => {
            println!("{}", cfv_render::classify(width_cm, height_cm));
        }

        Commands::Sizes => {
            for entry in cfv_render::PAPER_SIZES {
                match entry.imperial {
                    Some(imperial) => println!(
                        "{:<10} {:>7.2} x {:>7.2} cm  ({})",
                        entry.label, entry.width_cm, entry.height_cm, imperial
                    ),
                    None => println!(
                        "{:<10} {:>7.2} x {:>7.2} cm",
                        entry.label, entry.width_cm, entry.height_cm
                    ),
                }
            }
        }

        Commands::InitConfig { path } => {
            ViewerConfig::default().save(&path).await?;
            println!("Wrote default configuration → {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_page_range_is_one_based() {
        assert_eq!(page_range(Some(1), Some(2)).resolve(5), Some(0..=1));
        assert_eq!(page_range(None, None).resolve(3), Some(0..=2));
    }

    #[test]
    fn test_paper_labels_exist_in_catalog() {
        for paper in PaperArg::value_variants() {
            assert!(cfv_render::PrintSurface::from_paper_label(paper.label()).is_some());
        }
    }
}
