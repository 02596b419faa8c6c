use crate::{
    consts::{BANK_SIZE, LAYER2_FIRST_BANK, SPRITE_TRANSPARENT},
    emit::{column_label, ensure_identifier, write_c_bytes, EmitError, WriteIoSnafu},
    encode::{Block, Encoded, EncodedBitmap, EncodedSprite, EncodedTile, Sheet},
};
use snafu::ResultExt;
use std::{io::Write, str::FromStr};

/// How a bitmap is laid out in a header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitmapLayout {
    /// Banked for a full 256×192 screen, contiguous otherwise.
    #[default]
    Auto,
    /// One array per 8K bank plus a bank pointer table.
    Banked,
    /// A single array.
    Contiguous,
}

impl BitmapLayout {
    fn is_banked(self, bitmap: &EncodedBitmap) -> bool {
        match self {
            BitmapLayout::Auto => bitmap.is_full_screen(),
            BitmapLayout::Banked => true,
            BitmapLayout::Contiguous => false,
        }
    }
}

impl FromStr for BitmapLayout {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(layout) = s.eq_ignore_ascii_case("auto").then_some(BitmapLayout::Auto)
               .or_else(|| s.eq_ignore_ascii_case("banked").then_some(BitmapLayout::Banked))
               .or_else(|| s.eq_ignore_ascii_case("contiguous").then_some(BitmapLayout::Contiguous))
        else { return Err("expected one of: auto, banked, contiguous"); };

        Ok(layout)
    }
}

/// Header declaration details of a block type.
pub trait Declare: Block {
    /// Prefix of each block array and of the size macro.
    const ITEM: &'static str;
    /// Byte literals per line.
    const PER_LINE: usize;
    /// Comment lines describing the byte layout.
    const DESCRIPTION: &'static [&'static str];

    /// Extra `#define`s written after the size macro.
    fn defines() -> Vec<(String, String)> {
        Vec::new()
    }
}

impl Declare for EncodedTile {
    const ITEM: &'static str = "tile";
    const PER_LINE: usize = 8;
    const DESCRIPTION: &'static [&'static str] = &[
        "Tile definitions (8x8, 4-bit packed)",
        "32 bytes per tile, 2 pixels per byte (high nibble = left pixel)",
    ];
}

impl Declare for EncodedSprite {
    const ITEM: &'static str = "sprite";
    const PER_LINE: usize = 16;
    const DESCRIPTION: &'static [&'static str] = &[
        "Sprite definitions (16x16, 8-bit per pixel)",
        "256 bytes per sprite, palette index per pixel, 0xE3 = transparent",
    ];

    fn defines() -> Vec<(String, String)> {
        vec![(
            "SPRITE_TRANSPARENT".to_owned(),
            format!("0x{SPRITE_TRANSPARENT:02X}"),
        )]
    }
}

fn block_name<B: Declare>(col: usize, row: usize) -> String {
    format!("{}_{}{row}", B::ITEM, column_label(col))
}

fn write_guard_open<W: Write>(w: &mut W, guard: &str) -> std::io::Result<()> {
    writeln!(w, "#ifndef {guard}")?;
    writeln!(w, "#define {guard}")?;
    writeln!(w)?;
    writeln!(w, "#include <stdint.h>")?;
    writeln!(w)
}

/// Writes a pointer table, `per_line` names per line.
fn write_table<W: Write>(
    w: &mut W,
    name: &str,
    entries: &[String],
    per_line: usize,
) -> std::io::Result<()> {
    writeln!(
        w,
        "static const uint8_t * const {name}[{}] = {{",
        entries.len()
    )?;

    let lines = entries.chunks(per_line);
    let count = lines.len();
    for (i, line) in lines.enumerate() {
        let comma = if i + 1 < count { "," } else { "" };
        writeln!(w, "    {}{comma}", line.join(", "))?;
    }

    writeln!(w, "}};")?;
    writeln!(w)
}

/// Writes a tile or sprite sheet as a C header named after `set`.
///
/// Each block becomes `<item>_<Col><Row>`, followed by a `<set>` pointer table and a
/// `<SET>_AT(col, row)` accessor.
pub fn write_sheet_header<W: Write, B: Declare>(
    mut w: W,
    set: &str,
    sheet: &Sheet<B>,
) -> Result<(), EmitError> {
    ensure_identifier(set)?;

    let upper = set.to_ascii_uppercase();
    let item_upper = B::ITEM.to_ascii_uppercase();
    let guard = format!("{upper}_H");

    let mut write = || -> std::io::Result<()> {
        write_guard_open(&mut w, &guard)?;

        for line in B::DESCRIPTION {
            writeln!(w, "// {line}")?;
        }
        writeln!(w)?;

        writeln!(w, "#define {item_upper}_SIZE {}", B::SIZE)?;
        writeln!(w, "#define {upper}_WIDTH {}", sheet.columns())?;
        writeln!(w, "#define {upper}_HEIGHT {}", sheet.rows())?;
        for (name, value) in B::defines() {
            writeln!(w, "#define {name} {value}")?;
        }
        writeln!(w)?;

        let mut names = Vec::with_capacity(sheet.len());
        for (col, row, block) in sheet.cells() {
            let name = block_name::<B>(col, row);

            writeln!(w, "// {} at ({},{row})", B::ITEM, column_label(col))?;
            writeln!(w, "static const uint8_t {name}[{}] = {{", B::SIZE)?;
            write_c_bytes(&mut w, block.as_bytes(), B::PER_LINE)?;
            writeln!(w, "}};")?;
            writeln!(w)?;

            names.push(name);
        }

        writeln!(w, "// Array of all {}s for indexed access", B::ITEM)?;
        write_table(&mut w, set, &names, 4)?;

        writeln!(w, "// Get {} by grid position", B::ITEM)?;
        writeln!(
            w,
            "#define {upper}_AT(col, row) {set}[(row) * {upper}_WIDTH + (col)]"
        )?;
        writeln!(w)?;
        writeln!(w, "#endif // {guard}")
    };

    write().context(WriteIoSnafu)
}

/// Writes a Layer2 bitmap as a C header named after `name`.
pub fn write_bitmap_header<W: Write>(
    mut w: W,
    name: &str,
    bitmap: &EncodedBitmap,
    layout: BitmapLayout,
) -> Result<(), EmitError> {
    ensure_identifier(name)?;

    let upper = name.to_ascii_uppercase();
    let guard = format!("{upper}_H");
    let (width, height, size) = (bitmap.width(), bitmap.height(), bitmap.len());

    let mut write = || -> std::io::Result<()> {
        write_guard_open(&mut w, &guard)?;

        writeln!(w, "// Layer2 image: {name}")?;
        writeln!(w, "// Resolution: {width}x{height} (8-bit RGB332)")?;
        writeln!(w, "// Total size: {size} bytes")?;
        writeln!(w, "//")?;
        writeln!(w, "// RGB332 format: RRRGGGBB")?;
        writeln!(w)?;
        writeln!(w, "#define {upper}_WIDTH {width}")?;
        writeln!(w, "#define {upper}_HEIGHT {height}")?;
        writeln!(w, "#define {upper}_SIZE {size}")?;
        writeln!(w)?;

        if layout.is_banked(bitmap) {
            writeln!(w, "#define {upper}_BANK_SIZE {BANK_SIZE}")?;
            writeln!(w, "#define {upper}_NUM_BANKS {}", bitmap.bank_count())?;
            writeln!(w)?;

            let mut names = Vec::with_capacity(bitmap.bank_count());
            for bank in bitmap.banks() {
                let bank_name = format!("{name}_bank{}", bank.index);
                let first_row = bank.offset / width;
                let last_row = (bank.offset + bank.data.len() - 1) / width;

                writeln!(
                    w,
                    "// Bank {}: lines {first_row}-{last_row}",
                    bank.index
                )?;
                writeln!(
                    w,
                    "static const uint8_t {bank_name}[{}] = {{",
                    bank.data.len()
                )?;
                write_c_bytes(&mut w, bank.data, 16)?;
                writeln!(w, "}};")?;
                writeln!(w)?;

                names.push(bank_name);
            }

            writeln!(w, "// Array of bank pointers for easy access")?;
            write_table(&mut w, &format!("{name}_banks"), &names, 1)?;

            writeln!(w, "// Usage: Copy each bank to Layer2 memory")?;
            for i in 0..names.len() {
                writeln!(w, "// Bank {i} -> 8K bank {}", LAYER2_FIRST_BANK + i)?;
            }
            writeln!(w)?;
        } else {
            writeln!(w, "// Image data (row-major order, top to bottom)")?;
            writeln!(w, "static const uint8_t {name}_data[{size}] = {{")?;
            write_c_bytes(&mut w, bitmap.as_bytes(), 16)?;
            writeln!(w, "}};")?;
            writeln!(w)?;
            writeln!(
                w,
                "// Pixel (x, y) is {name}_data[(y) * {upper}_WIDTH + (x)]"
            )?;
            writeln!(w)?;
        }

        writeln!(w, "#endif // {guard}")
    };

    write().context(WriteIoSnafu)
}

/// Writes any encoded result as a C header. `name` is the set name for sheets and the image
/// name for bitmaps.
pub fn write_header<W: Write>(
    w: W,
    name: &str,
    encoded: &Encoded,
    layout: BitmapLayout,
) -> Result<(), EmitError> {
    match encoded {
        Encoded::Tiles(sheet) => write_sheet_header(w, name, sheet),
        Encoded::Sprites(sheet) => write_sheet_header(w, name, sheet),
        Encoded::Bitmap(bitmap) => write_bitmap_header(w, name, bitmap, layout),
    }
}
