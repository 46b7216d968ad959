//! folio CLI - add section pages to PDFs and extract page content

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use folio::{
    add_paragraph, append_sections_with_options, detect_header_from_path,
    extract_page_with_options, page_sizes, place_image, render, stamp_heading, BoundingBox,
    ExtractOptions, HeadingOptions, ImageOptions, JsonFormat, ParagraphOptions, SectionOptions,
};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Add section pages to PDFs and extract positioned page content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append "LABEL - Page N" divider pages after the last page
    Append {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file (overwritten)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of pages to append
        #[arg(short = 'n', long)]
        count: u32,

        /// Heading label
        #[arg(short, long)]
        label: String,

        /// Heading font size in points
        #[arg(long, default_value = "20")]
        font_size: f32,
    },

    /// Extract positioned text and images from one page
    Extract {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Page number (1-based)
        #[arg(short, long)]
        page: u32,

        /// Directory for extracted images
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Print JSON instead of the listing
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Fail on the first image that cannot be resolved
        #[arg(long)]
        strict: bool,

        /// Do not look inside Form XObjects
        #[arg(long)]
        no_forms: bool,
    },

    /// Stamp a boxed heading across the top of a page
    Stamp {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file (overwritten)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Heading text
        #[arg(long)]
        heading: String,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Heading font size in points
        #[arg(long, default_value = "80")]
        font_size: f32,
    },

    /// Place a framed PNG or JPEG photo on a page
    Image {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file (overwritten)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// PNG or JPEG file to place
        #[arg(long, value_name = "FILE")]
        image: PathBuf,

        /// Left edge of the image in points
        #[arg(long)]
        x: f32,

        /// Bottom edge of the image in points
        #[arg(long)]
        y: f32,

        /// Drawn width in points
        #[arg(long)]
        width: f32,

        /// Drawn height in points
        #[arg(long)]
        height: f32,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Place the bare image without the white frame
        #[arg(long)]
        no_frame: bool,
    },

    /// Word-wrap a paragraph into a box on a page
    Paragraph {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output PDF file (overwritten)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Paragraph text
        #[arg(long)]
        text: String,

        /// Left edge of the box in points
        #[arg(long)]
        x: f32,

        /// Bottom edge of the box in points
        #[arg(long)]
        y: f32,

        /// Box width in points
        #[arg(long)]
        width: f32,

        /// Box height in points
        #[arg(long)]
        height: f32,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Font size in points
        #[arg(long, default_value = "15")]
        font_size: f32,

        /// Leave out the note drawn behind the text
        #[arg(long)]
        no_backdrop: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Append {
            input,
            output,
            count,
            label,
            font_size,
        } => cmd_append(&input, &output, count, &label, font_size),
        Commands::Extract {
            input,
            page,
            output_dir,
            json,
            compact,
            strict,
            no_forms,
        } => {
            let mut options = ExtractOptions::new().with_form_xobjects(!no_forms);
            if strict {
                options = options.strict();
            }
            let format = json.then_some(if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            });
            cmd_extract(&input, page, &output_dir, format, &options)
        }
        Commands::Stamp {
            input,
            output,
            heading,
            page,
            font_size,
        } => cmd_stamp(&input, &output, &heading, page, font_size),
        Commands::Image {
            input,
            output,
            image,
            x,
            y,
            width,
            height,
            page,
            no_frame,
        } => {
            let area = BoundingBox::new(x, y, x + width, y + height);
            let mut options = ImageOptions::new();
            if no_frame {
                options = options.unframed();
            }
            cmd_image(&input, &output, &image, page, area, &options)
        }
        Commands::Paragraph {
            input,
            output,
            text,
            x,
            y,
            width,
            height,
            page,
            font_size,
            no_backdrop,
        } => {
            let frame = BoundingBox::new(x, y, x + width, y + height);
            let mut options = ParagraphOptions::new().with_font_size(font_size);
            if no_backdrop {
                options = options.with_backdrop(None);
            }
            cmd_paragraph(&input, &output, &text, page, frame, &options)
        }
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_append(
    input: &Path,
    output: &Path,
    count: u32,
    label: &str,
    font_size: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = SectionOptions::new().with_font_size(font_size);
    let report = append_sections_with_options(input, output, count, label, &options)?;

    println!(
        "{} {} section pages ({} x {} pt) after {} original pages",
        "Appended".green(),
        report.generated_pages,
        report.page_size.width,
        report.page_size.height,
        report.original_pages
    );
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_extract(
    input: &Path,
    page: u32,
    output_dir: &Path,
    format: Option<JsonFormat>,
    options: &ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = extract_page_with_options(input, page, options)?;

    match format {
        Some(format) => println!("{}", render::to_json(&content, format)?),
        None => print!("{}", render::to_listing(&content)),
    }

    // Status goes to stderr so JSON on stdout stays parseable
    if !content.skipped_images.is_empty() {
        eprintln!(
            "{} {} image(s) could not be resolved",
            "Warning:".yellow().bold(),
            content.skipped_images.len()
        );
    }
    if content.images.is_empty() {
        return Ok(());
    }

    for path in content.save_images(output_dir)? {
        eprintln!("{} {}", "Saved".green(), path.display());
    }

    Ok(())
}

fn cmd_stamp(
    input: &Path,
    output: &Path,
    heading: &str,
    page: u32,
    font_size: f32,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = HeadingOptions::new().with_font_size(font_size);
    let frame = stamp_heading(input, output, page, heading, &options)?;

    println!(
        "{} \"{}\" on page {} at (x: {:.2}, y: {:.2}, w: {:.2}, h: {:.2})",
        "Stamped".green(),
        heading,
        page,
        frame.x0,
        frame.y0,
        frame.width(),
        frame.height()
    );
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_image(
    input: &Path,
    output: &Path,
    image: &Path,
    page: u32,
    area: BoundingBox,
    options: &ImageOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(image)?;
    let placed = place_image(input, output, page, &bytes, area, options)?;

    println!(
        "{} {} ({}x{} px, {}) on page {} at (x: {:.2}, y: {:.2}, w: {:.2}, h: {:.2})",
        "Placed".green(),
        image.display(),
        placed.pixel_width,
        placed.pixel_height,
        placed.mime_type,
        page,
        placed.image.x0,
        placed.image.y0,
        placed.image.width(),
        placed.image.height()
    );
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_paragraph(
    input: &Path,
    output: &Path,
    text: &str,
    page: u32,
    frame: BoundingBox,
    options: &ParagraphOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = add_paragraph(input, output, page, text, frame, options)?;

    println!(
        "{} {} line(s) on page {}",
        "Wrote".green(),
        report.lines.len(),
        page
    );
    if report.overflow {
        eprintln!(
            "{} text runs past the bottom of the {:.0}pt box",
            "Warning:".yellow().bold(),
            frame.height()
        );
    }
    println!("{} {}", "Saved to".green(), output.display());
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let header = detect_header_from_path(input)?;
    let sizes = page_sizes(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), header.version);
    println!("{}: {}", "Pages".bold(), sizes.len());

    println!();
    println!("{}", "Page Sizes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (index, size) in sizes.iter().enumerate() {
        println!(
            "{:>5}: {} x {} pt{}",
            index + 1,
            size.width,
            size.height,
            if size.is_landscape() {
                " (landscape)"
            } else {
                ""
            }
        );
    }

    Ok(())
}
