use argh::FromArgs;
use image::DynamicImage;
use log::{info, warn};
use nextgfx::{
    consts::{BANK_SIZE, LAYER2_HEIGHT, LAYER2_WIDTH},
    emit::{self, asm, sanitize_identifier, BitmapLayout},
    encode::{self, Encoded},
    extract,
    partition::PageLayout,
    ColorLookup, EncodeConfig, EncodedBitmap, Format, Palette, Quantizer, Raster, Rgb332Mode,
};
use std::{error::Error, fs::File, io::BufReader, path::Path};

/// ZX Spectrum Next graphics converter.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Header(Header),
    Asm(Asm),
    Extract(Extract),
}

/// Converts an image into a C header of tiles, sprites or a Layer2 bitmap.
#[derive(FromArgs)]
#[argh(subcommand, name = "header")]
struct Header {
    /// the input image (png, bmp, tiff, jpg)
    #[argh(positional)]
    input: String,
    /// output format: tile, sprite or bitmap
    #[argh(positional)]
    mode: Format,

    /// maximum number of tile or sprite rows to convert
    #[argh(option)]
    rows: Option<usize>,
    /// the output file (default: tileset.h, spriteset.h or <name>.h)
    #[argh(option, short = 'o')]
    output: Option<String>,
    /// name for the generated arrays and macros
    #[argh(option)]
    name: Option<String>,
    /// only accept exact palette colors; anything else becomes index 0
    #[argh(switch)]
    exact: bool,
    /// bitmap only: truncate pixels to RGB332 instead of going through the palette
    #[argh(switch)]
    truncate: bool,
    /// bitmap only: auto (default), banked or contiguous
    #[argh(option)]
    layout: Option<BitmapLayout>,
    /// JSON palette file with `colors` and `hardware` tables
    #[argh(option)]
    palette: Option<String>,
}

/// Converts a 192-line image into z88dk assembly, one section per memory page.
#[derive(FromArgs)]
#[argh(subcommand, name = "asm")]
struct Asm {
    /// the input image, 1-256 pixels wide and exactly 192 high
    #[argh(positional)]
    input: String,
    /// number of the first page
    #[argh(positional)]
    start_page: u8,
    /// the output file (default: <label>_data.asm)
    #[argh(positional)]
    output: Option<String>,

    /// bytes per page
    #[argh(option, default = "BANK_SIZE")]
    page_size: usize,
    /// label base for the page symbols (default: input file name)
    #[argh(option)]
    label: Option<String>,
    /// quantize to the palette instead of truncating to RGB332
    #[argh(switch)]
    quantize: bool,
    /// JSON palette file, used with --quantize
    #[argh(option)]
    palette: Option<String>,
}

/// Reads the raw bytes of a generated header back into a binary file.
#[derive(FromArgs)]
#[argh(subcommand, name = "extract")]
struct Extract {
    /// the header file
    #[argh(positional)]
    input: String,
    /// the binary output file
    #[argh(positional)]
    output: String,

    /// image name: reads <name>_data or all <name>_bank<n> arrays (default: input file name)
    #[argh(option)]
    name: Option<String>,
    /// read a single array with this exact name instead
    #[argh(option)]
    array: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli { command } = argh::from_env();

    match command {
        Command::Header(options) => write_header(options),
        Command::Asm(options) => write_asm(options),
        Command::Extract(options) => extract_binary(options),
    }
}

fn ensure_exists(input: &str) -> Result<(), Box<dyn Error>> {
    if !Path::new(input).is_file() {
        return Err(format!("input file not found: {input}").into());
    }
    Ok(())
}

fn load_image(input: &str) -> Result<DynamicImage, Box<dyn Error>> {
    ensure_exists(input)?;
    Ok(image::io::Reader::open(input)?
        .with_guessed_format()?
        .decode()?)
}

fn load_palette(path: Option<&str>) -> Result<Palette, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(Palette::ZX_SPECTRUM);
    };

    ensure_exists(path)?;
    let palette = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    info!("Using palette from `{path}`");

    Ok(palette)
}

/// Identifier derived from the input file name.
fn stem_name(input: &str) -> String {
    let stem = Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    sanitize_identifier(&stem)
}

fn default_set_name(mode: Format, input: &str) -> String {
    match mode {
        Format::Tile => "tileset".to_owned(),
        Format::Sprite => "spriteset".to_owned(),
        Format::Bitmap => stem_name(input),
    }
}

/// Options passed to `header` that the chosen mode does not use.
fn ignored_header_options(
    mode: Format,
    rows: Option<usize>,
    truncate: bool,
    layout: Option<BitmapLayout>,
) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    match mode {
        Format::Bitmap => {
            if rows.is_some() {
                ignored.push("--rows");
            }
        }
        Format::Tile | Format::Sprite => {
            if truncate {
                ignored.push("--truncate");
            }
            if layout.is_some() {
                ignored.push("--layout");
            }
        }
    }
    ignored
}

fn write_header(options: Header) -> Result<(), Box<dyn Error>> {
    let Header {
        input,
        mode,
        rows,
        output,
        name,
        exact,
        truncate,
        layout,
        palette,
    } = options;

    let image = load_image(&input)?.into_rgba8();
    let (width, height) = (image.width() as usize, image.height() as usize);
    info!("Converting `{input}` ({width}x{height}) as {mode}");

    let raster = Raster::rgba(width, height, image.as_raw())?;
    let raster = match mode {
        Format::Bitmap if width > LAYER2_WIDTH || height > LAYER2_HEIGHT => {
            warn!("Cropping to {LAYER2_WIDTH}x{LAYER2_HEIGHT}");
            raster.crop(LAYER2_WIDTH, LAYER2_HEIGHT)
        }
        _ => raster,
    };

    for option in ignored_header_options(mode, rows, truncate, layout) {
        warn!("{option} has no effect on {mode}s");
    }

    let config = EncodeConfig {
        palette: load_palette(palette.as_deref())?,
        lookup: if exact {
            ColorLookup::Exact
        } else {
            ColorLookup::Nearest
        },
        rgb332: if truncate {
            Rgb332Mode::Truncate
        } else {
            Rgb332Mode::Palette
        },
        rows,
    };

    let encoded = encode::encode(mode, &raster, &config)?;

    let name = name.unwrap_or_else(|| default_set_name(mode, &input));
    let output = output.unwrap_or_else(|| format!("{name}.h"));

    let mut v = Vec::with_capacity(encoded.byte_len() * 6);
    emit::write_header(&mut v, &name, &encoded, layout.unwrap_or_default())?;
    std::fs::write(&output, &v)?;

    info!("Generated `{output}`");
    match &encoded {
        Encoded::Tiles(sheet) => info!(
            "  Tiles: {}x{} = {}",
            sheet.columns(),
            sheet.rows(),
            sheet.len()
        ),
        Encoded::Sprites(sheet) => info!(
            "  Sprites: {}x{} = {}",
            sheet.columns(),
            sheet.rows(),
            sheet.len()
        ),
        Encoded::Bitmap(bitmap) => info!(
            "  Bitmap: {}x{}, {} banks",
            bitmap.width(),
            bitmap.height(),
            bitmap.bank_count()
        ),
    }
    info!("  Size: {} bytes", encoded.byte_len());

    Ok(())
}

/// Options passed to `asm` that truncation does not use.
fn ignored_asm_options(quantize: bool, palette: Option<&str>) -> Vec<&'static str> {
    match (quantize, palette) {
        (false, Some(_)) => vec!["--palette"],
        _ => Vec::new(),
    }
}

fn write_asm(options: Asm) -> Result<(), Box<dyn Error>> {
    let Asm {
        input,
        start_page,
        output,
        page_size,
        label,
        quantize,
        palette,
    } = options;

    let label = label.unwrap_or_else(|| stem_name(&input));
    let output = output.unwrap_or_else(|| format!("{label}_data.asm"));

    info!("Converting `{input}`, start page {start_page}, output `{output}`");

    let image = load_image(&input)?.into_rgb8();
    let (width, height) = (image.width() as usize, image.height() as usize);
    let raster = Raster::rgb(width, height, image.as_raw())?;

    for option in ignored_asm_options(quantize, palette.as_deref()) {
        warn!("{option} has no effect without --quantize");
    }
    let (palette, mode) = if quantize {
        (load_palette(palette.as_deref())?, Rgb332Mode::Palette)
    } else {
        (Palette::ZX_SPECTRUM, Rgb332Mode::Truncate)
    };
    let bitmap = EncodedBitmap::encode_full_height(&raster, &Quantizer::new(&palette), mode)?;

    let layout = PageLayout::new(start_page).with_page_size(page_size);
    let mut v = Vec::with_capacity(bitmap.len() * 6);
    let pages = asm::write_paged_bitmap(&mut v, &label, &bitmap, layout)?;
    std::fs::write(&output, &v)?;

    info!("Image: {width}x{height} pixels, {} bytes", bitmap.len());
    if let (Some(first), Some(last)) = (pages.first(), pages.last()) {
        info!("Generated `{output}`: {} pages ({first}-{last})", pages.len());
    }

    println!("Add to C code:");
    for page in pages {
        println!("  extern uint8_t {label}_page{page};");
    }

    Ok(())
}

fn extract_binary(options: Extract) -> Result<(), Box<dyn Error>> {
    let Extract {
        input,
        output,
        name,
        array,
    } = options;

    ensure_exists(&input)?;
    let text = std::fs::read_to_string(&input)?;

    let bytes = match array {
        Some(array) => extract::extract_array(&text, &array)?,
        None => {
            let name = name.unwrap_or_else(|| stem_name(&input));
            extract::extract_image(&text, &name)?
        }
    };

    std::fs::write(&output, &bytes)?;
    info!("Extracted {} bytes to `{output}`", bytes.len());

    Ok(())
}
