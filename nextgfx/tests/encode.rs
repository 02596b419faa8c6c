use image::{Rgba, RgbaImage};
use nextgfx::{
    consts::{BANK_SIZE, SPRITE_TRANSPARENT},
    encode::{self, Block, EncodeError},
    partition::{self, PageLayout},
    ColorLookup, EncodeConfig, Encoded, EncodedBitmap, EncodedSprite, EncodedTile, Format,
    Palette, Quantizer, Raster, Rgb332Mode, Sheet,
};

fn raster(image: &RgbaImage) -> Raster<'_> {
    Raster::rgba(image.width() as usize, image.height() as usize, image.as_raw()).unwrap()
}

fn palette_pixel(palette: &Palette, index: u8) -> Rgba<u8> {
    let [r, g, b] = palette.color(index);
    Rgba([r, g, b, 255])
}

/// Smooth red/green ramps with an xor pattern in blue, mostly off-palette.
fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x ^ y) & 0xFF) as u8,
            255,
        ])
    })
}

#[test]
fn quantizer_always_in_range() {
    let palette = Palette::ZX_SPECTRUM;
    for r in (0..=255).step_by(15) {
        for g in (0..=255).step_by(15) {
            for b in (0..=255).step_by(15) {
                assert!(palette.nearest([r, g, b]) < 16);
            }
        }
    }
}

#[test]
fn hardware_table_is_fixed() {
    assert_eq!(
        Palette::ZX_SPECTRUM.hardware,
        [
            0x00, 0x02, 0xC0, 0xC2, 0x18, 0x1A, 0xD8, 0xDA, 0x00, 0x03, 0xE0, 0xE3, 0x1C, 0x1F,
            0xFC, 0xFF
        ]
    );
    // bright black stays a separate slot
    assert_eq!(Palette::ZX_SPECTRUM.colors[8], Palette::ZX_SPECTRUM.colors[0]);
}

#[test]
fn solid_tile_unpacks_to_its_color() {
    let palette = Palette::ZX_SPECTRUM;
    let quantizer = Quantizer::new(&palette);

    for index in 0..16 {
        let image = RgbaImage::from_pixel(8, 8, palette_pixel(&palette, index));
        let tile = EncodedTile::encode(&quantizer, &raster(&image), 0, 0);
        let expected = palette.nearest(palette.color(index));

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(tile.index_at(x, y), expected, "color {index} at ({x}, {y})");
            }
        }
    }
}

#[test]
fn tile_packs_left_pixel_high() {
    let palette = Palette::ZX_SPECTRUM;
    let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
    image.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

    let tile = EncodedTile::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);

    assert_eq!(tile.0[0], 0x0F);
    // the rest is black padding
    assert!(tile.0[1..].iter().all(|&b| b == 0x00));
}

#[test]
fn tile_rows_are_top_to_bottom() {
    let palette = Palette::ZX_SPECTRUM;
    let image = RgbaImage::from_fn(8, 8, |x, y| palette_pixel(&palette, ((x + y) % 8) as u8));

    let tile = EncodedTile::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);

    assert_eq!(&tile.0[..4], &[0x01, 0x23, 0x45, 0x67]);
    assert_eq!(&tile.0[4..8], &[0x12, 0x34, 0x56, 0x70]);
}

#[test]
fn transparent_pixels_become_sentinel() {
    let palette = Palette::ZX_SPECTRUM;
    let image = RgbaImage::from_fn(16, 16, |x, y| {
        let alpha = if (x + y) % 2 == 0 { 127 } else { 128 };
        Rgba([255, 0, 0, alpha])
    });

    let sprite = EncodedSprite::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);

    for y in 0..16 {
        for x in 0..16 {
            let expected = if (x + y) % 2 == 0 { None } else { Some(10) };
            assert_eq!(sprite.index_at(x, y), expected);
        }
    }
}

#[test]
fn fully_transparent_sprite() {
    let palette = Palette::ZX_SPECTRUM;
    let image = RgbaImage::from_pixel(16, 16, Rgba([12, 200, 99, 0]));

    let sprite = EncodedSprite::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);

    assert_eq!(sprite.0, [SPRITE_TRANSPARENT; 256]);
    assert!(sprite.is_fully_transparent());
}

#[test]
fn sprite_bytes_are_palette_indices() {
    let palette = Palette::ZX_SPECTRUM;
    // bright magenta has hardware byte 0xE3, but sprites store its index
    let image = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 255, 255]));

    let sprite = EncodedSprite::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);

    assert_eq!(sprite.0, [11; 256]);
}

#[test]
fn sheets_drop_partial_blocks() {
    let palette = Palette::ZX_SPECTRUM;
    let image = gradient(37, 20);

    let sheet: Sheet<EncodedTile> =
        Sheet::encode(&raster(&image), &Quantizer::new(&palette), None).unwrap();
    assert_eq!((sheet.columns(), sheet.rows()), (4, 2));
    assert_eq!(sheet.len(), 8);

    let sheet: Sheet<EncodedSprite> =
        Sheet::encode(&raster(&image), &Quantizer::new(&palette), None).unwrap();
    assert_eq!((sheet.columns(), sheet.rows()), (2, 1));
}

#[test]
fn sheet_order_is_row_major() {
    let palette = Palette::ZX_SPECTRUM;
    // each 8x8 cell gets palette color (col + 3 * row)
    let image = RgbaImage::from_fn(24, 16, |x, y| palette_pixel(&palette, (x / 8 + 3 * (y / 8)) as u8));
    let quantizer = Quantizer::new(&palette);

    let sheet: Sheet<EncodedTile> = Sheet::encode(&raster(&image), &quantizer, None).unwrap();

    for (col, row, tile) in sheet.cells() {
        let index = (col + 3 * row) as u8;
        assert_eq!(tile.index_at(0, 0), index);
        assert_eq!(sheet.blocks()[row * 3 + col], *tile);
        assert_eq!(sheet.get(col, row), Some(tile));
    }
    assert_eq!(sheet.get(3, 0), None);
}

#[test]
fn sheet_row_limit() {
    let palette = Palette::ZX_SPECTRUM;
    let image = gradient(64, 64);

    let sheet: Sheet<EncodedSprite> =
        Sheet::encode(&raster(&image), &Quantizer::new(&palette), Some(2)).unwrap();
    assert_eq!((sheet.columns(), sheet.rows()), (4, 2));

    let sheet: Sheet<EncodedSprite> =
        Sheet::encode(&raster(&image), &Quantizer::new(&palette), Some(10)).unwrap();
    assert_eq!(sheet.rows(), 4);
}

#[test]
fn sheet_without_complete_block_is_an_error() {
    let palette = Palette::ZX_SPECTRUM;
    let image = gradient(15, 40);

    let result: Result<Sheet<EncodedSprite>, _> =
        Sheet::encode(&raster(&image), &Quantizer::new(&palette), None);
    assert!(matches!(
        result,
        Err(EncodeError::NoCompleteBlocks { block: 16, .. })
    ));
}

#[test]
fn exact_lookup_maps_unknown_colors_to_black() {
    let palette = Palette::ZX_SPECTRUM;
    let image = RgbaImage::from_pixel(8, 8, Rgba([250, 250, 250, 255]));

    let nearest = EncodedTile::encode(&Quantizer::new(&palette), &raster(&image), 0, 0);
    let exact = EncodedTile::encode(
        &Quantizer::with_lookup(&palette, ColorLookup::Exact),
        &raster(&image),
        0,
        0,
    );

    assert_eq!(nearest.0, [0xFF; 32]);
    assert_eq!(exact.0, [0x00; 32]);
}

#[test]
fn bitmap_modes() {
    let palette = Palette::ZX_SPECTRUM;
    let quantizer = Quantizer::new(&palette);
    let image = RgbaImage::from_pixel(3, 2, Rgba([192, 192, 192, 255]));

    let by_palette = EncodedBitmap::encode(&raster(&image), &quantizer, Rgb332Mode::Palette).unwrap();
    let truncated = EncodedBitmap::encode(&raster(&image), &quantizer, Rgb332Mode::Truncate).unwrap();

    assert_eq!(by_palette.as_bytes(), [0xDA; 6]);
    assert_eq!(truncated.as_bytes(), [0xDB; 6]);
    assert_eq!((by_palette.width(), by_palette.height()), (3, 2));
}

#[test]
fn bitmap_size_limits() {
    let palette = Palette::ZX_SPECTRUM;
    let quantizer = Quantizer::new(&palette);

    let wide = gradient(257, 10);
    assert!(matches!(
        EncodedBitmap::encode(&raster(&wide), &quantizer, Rgb332Mode::Palette),
        Err(EncodeError::TooLarge { .. })
    ));

    let short = gradient(100, 191);
    assert!(matches!(
        EncodedBitmap::encode_full_height(&raster(&short), &quantizer, Rgb332Mode::Truncate),
        Err(EncodeError::FullHeightRequired { height: 191, .. })
    ));

    let empty = RgbaImage::new(0, 0);
    assert!(matches!(
        EncodedBitmap::encode(&raster(&empty), &quantizer, Rgb332Mode::Palette),
        Err(EncodeError::EmptyImage)
    ));
}

#[test]
fn full_screen_bitmap_is_six_banks() {
    let palette = Palette::ZX_SPECTRUM;
    let image = gradient(256, 192);

    let bitmap =
        EncodedBitmap::encode(&raster(&image), &Quantizer::new(&palette), Rgb332Mode::Palette)
            .unwrap();
    let banks = bitmap.banks().collect::<Vec<_>>();

    assert!(bitmap.is_full_screen());
    assert_eq!(bitmap.len(), 49152);
    assert_eq!(banks.len(), 6);
    assert!(banks.iter().all(|bank| bank.data.len() == BANK_SIZE));
    let joined = banks.iter().flat_map(|bank| bank.data.iter().copied()).collect::<Vec<_>>();
    assert_eq!(joined, bitmap.as_bytes());
}

#[test]
fn pages_cover_narrow_images() {
    let palette = Palette::ZX_SPECTRUM;
    let quantizer = Quantizer::new(&palette);

    for width in [1, 17, 42, 43, 100, 255, 256] {
        let image = gradient(width, 192);
        let bitmap =
            EncodedBitmap::encode_full_height(&raster(&image), &quantizer, Rgb332Mode::Truncate)
                .unwrap();
        let total = width as usize * 192;

        let pages = partition::pages(bitmap.as_bytes(), PageLayout::new(40)).unwrap();

        assert_eq!(pages.len(), (total + BANK_SIZE - 1) / BANK_SIZE, "width {width}");
        let last_len = match total % BANK_SIZE {
            0 => BANK_SIZE,
            rest => rest,
        };
        assert_eq!(pages.last().unwrap().data.len(), last_len, "width {width}");
        assert_eq!(pages[0].number, 40);

        let joined = pages.iter().flat_map(|p| p.data.iter().copied()).collect::<Vec<_>>();
        assert_eq!(joined, bitmap.as_bytes(), "width {width}");
    }
}

#[test]
fn dispatch_by_format() {
    let image = gradient(32, 32);
    let config = EncodeConfig::default();

    let tiles = encode::encode(Format::Tile, &raster(&image), &config).unwrap();
    let sprites = encode::encode(Format::Sprite, &raster(&image), &config).unwrap();
    let bitmap = encode::encode(Format::Bitmap, &raster(&image), &config).unwrap();

    assert!(matches!(&tiles, Encoded::Tiles(sheet) if sheet.len() == 16));
    assert!(matches!(&sprites, Encoded::Sprites(sheet) if sheet.len() == 4));
    assert!(matches!(&bitmap, Encoded::Bitmap(b) if b.len() == 1024));

    assert_eq!(tiles.format(), Format::Tile);
    assert_eq!(tiles.byte_len(), 16 * 32);
    assert_eq!(sprites.byte_len(), 4 * 256);
    assert_eq!(bitmap.byte_len(), 1024);
}

#[test]
fn rgb_rasters_are_opaque() {
    let palette = Palette::ZX_SPECTRUM;
    let data = [0u8, 0, 255].repeat(16 * 16);
    let raster = Raster::rgb(16, 16, &data).unwrap();

    let sprite = EncodedSprite::encode(&Quantizer::new(&palette), &raster, 0, 0);

    assert_eq!(sprite.0, [9; 256]);
}
