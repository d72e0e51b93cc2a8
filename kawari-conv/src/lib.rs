//! 320x200 16-colour bitmap conversion
//!
//! Builds a palette of at most 16 colours in first-seen order (row by
//! row), prints each entry as an 18-bit RGB value (6 bits per channel)
//! and packs the pixels two 4-bit palette indexes per byte, left pixel in
//! the high nibble. The bitmap is followed by 768 zero bytes.

use std::collections::HashMap;

use image::RgbImage;
use tracing::debug;

pub const MAX_COLORS: usize = 16;
/// Zero bytes appended after the packed pixels.
pub const TRAILER_LEN: usize = 384 * 2;
pub const DEFAULT_OUTPUT: &str = "320x200.bin";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvError {
    #[error("more than 16 colors ({count} found)")]
    TooManyColors { count: usize },

    #[error("width {width} is odd; pixels are packed in pairs")]
    OddWidth { width: u32 },
}

pub type Result<T> = std::result::Result<T, ConvError>;

/// How palette entries are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteFormat {
    /// 18 binary digits followed by six zero padding bits.
    #[default]
    Binary,
    /// Two hex digits per 6-bit channel, then `00`.
    Hex,
}

#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
    index: HashMap<[u8; 3], u8>,
}

impl Palette {
    /// Collect every colour in the image. Fails if there are more than 16.
    pub fn from_image(img: &RgbImage) -> Result<Self> {
        let mut colors = Vec::new();
        let mut seen = HashMap::new();
        for pixel in img.pixels() {
            seen.entry(pixel.0).or_insert_with(|| {
                colors.push(pixel.0);
                colors.len() - 1
            });
        }

        if colors.len() > MAX_COLORS {
            return Err(ConvError::TooManyColors { count: colors.len() });
        }

        let index = seen.into_iter().map(|(rgb, i)| (rgb, i as u8)).collect();
        Ok(Self { colors, index })
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    pub fn index_of(&self, rgb: [u8; 3]) -> Option<u8> {
        self.index.get(&rgb).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// One line per entry, in index order.
    pub fn render(&self, format: PaletteFormat) -> String {
        self.colors
            .iter()
            .map(|rgb| format!("{}\n", format_entry(*rgb, format)))
            .collect()
    }
}

/// Drop the two low bits of each channel and pack as `rrrrrr gggggg bbbbbb`.
pub fn encode_rgb18([r, g, b]: [u8; 3]) -> u32 {
    let (r, g, b) = (u32::from(r >> 2), u32::from(g >> 2), u32::from(b >> 2));
    r << 12 | g << 6 | b
}

pub fn format_entry(rgb: [u8; 3], format: PaletteFormat) -> String {
    match format {
        PaletteFormat::Binary => format!("{:018b}000000", encode_rgb18(rgb)),
        PaletteFormat::Hex => {
            let [r, g, b] = rgb;
            format!("{:02x} {:02x} {:02x} 00", r >> 2, g >> 2, b >> 2)
        }
    }
}

/// Two pixels per byte, then the zero trailer.
pub fn pack_pixels(img: &RgbImage, palette: &Palette) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width % 2 != 0 {
        return Err(ConvError::OddWidth { width });
    }

    let mut out = Vec::with_capacity((width / 2 * height) as usize + TRAILER_LEN);
    for y in 0..height {
        for x in (0..width).step_by(2) {
            let hi = palette.index_of(img.get_pixel(x, y).0).unwrap_or(0) & 0x0f;
            let lo = palette.index_of(img.get_pixel(x + 1, y).0).unwrap_or(0) & 0x0f;
            out.push(hi << 4 | lo);
        }
    }
    out.resize(out.len() + TRAILER_LEN, 0);
    Ok(out)
}

pub struct Conversion {
    pub palette: Palette,
    pub data: Vec<u8>,
}

pub fn convert(img: &RgbImage) -> Result<Conversion> {
    let palette = Palette::from_image(img)?;
    let data = pack_pixels(img, &palette)?;
    debug!(
        "{}x{}: {} colors, {} bytes",
        img.width(),
        img.height(),
        palette.len(),
        data.len()
    );
    Ok(Conversion { palette, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BLACK: [u8; 3] = [0, 0, 0];
    const WHITE: [u8; 3] = [255, 255, 255];
    const RED: [u8; 3] = [255, 0, 0];

    fn image_from(width: u32, rows: &[&[[u8; 3]]]) -> RgbImage {
        RgbImage::from_fn(width, rows.len() as u32, |x, y| Rgb(rows[y as usize][x as usize]))
    }

    #[test]
    fn rgb18_drops_low_bits() {
        assert_eq!(encode_rgb18(WHITE), 0x3ffff);
        assert_eq!(encode_rgb18(RED), 0x3f << 12);
        assert_eq!(encode_rgb18([0, 3, 4]), 1);
        assert_eq!(encode_rgb18([4, 8, 12]), 1 << 12 | 2 << 6 | 3);
    }

    #[test]
    fn binary_entry_is_24_digits() {
        assert_eq!(
            format_entry(RED, PaletteFormat::Binary),
            "111111000000000000000000"
        );
        assert_eq!(
            format_entry([4, 8, 12], PaletteFormat::Binary),
            "000001000010000011000000"
        );
    }

    #[test]
    fn hex_entry_per_channel() {
        assert_eq!(format_entry(WHITE, PaletteFormat::Hex), "3f 3f 3f 00");
        assert_eq!(format_entry([40, 8, 0], PaletteFormat::Hex), "0a 02 00 00");
    }

    #[test]
    fn palette_first_seen_order() {
        let img = image_from(4, &[&[WHITE, BLACK, WHITE, RED], &[RED, RED, BLACK, BLACK]]);
        let palette = Palette::from_image(&img).unwrap();
        assert_eq!(palette.colors(), &[WHITE, BLACK, RED]);
        assert_eq!(palette.index_of(RED), Some(2));
        assert_eq!(palette.index_of([1, 2, 3]), None);
        assert_eq!(palette.render(PaletteFormat::Hex), "3f 3f 3f 00\n00 00 00 00\n3f 00 00 00\n");
    }

    #[test]
    fn seventeen_colors_rejected() {
        let img = RgbImage::from_fn(17, 1, |x, _| Rgb([x as u8 * 8, 0, 0]));
        assert!(matches!(
            Palette::from_image(&img),
            Err(ConvError::TooManyColors { count: 17 })
        ));
    }

    #[test]
    fn sixteen_colors_fit() {
        let img = RgbImage::from_fn(16, 1, |x, _| Rgb([x as u8 * 8, 0, 0]));
        assert_eq!(Palette::from_image(&img).unwrap().len(), 16);
    }

    #[test]
    fn pixels_pack_high_nibble_first() {
        let img = image_from(4, &[&[WHITE, BLACK, WHITE, RED], &[RED, RED, BLACK, BLACK]]);
        let conversion = convert(&img).unwrap();
        assert_eq!(&conversion.data[..4], &[0x01, 0x02, 0x22, 0x11]);
        assert_eq!(conversion.data.len(), 4 + TRAILER_LEN);
        assert!(conversion.data[4..].iter().all(|&b| b == 0));
    }

    #[test]
    fn index_fifteen_fills_nibble() {
        let img = RgbImage::from_fn(16, 1, |x, _| Rgb([x as u8 * 8, 0, 0]));
        let conversion = convert(&img).unwrap();
        assert_eq!(conversion.data[0], 0x01);
        assert_eq!(conversion.data[7], 0xef);
    }

    #[test]
    fn odd_width_rejected() {
        let img = image_from(3, &[&[WHITE, BLACK, RED]]);
        assert_eq!(convert(&img).err(), Some(ConvError::OddWidth { width: 3 }));
    }

    #[test]
    fn full_screen_size() {
        let img = RgbImage::new(320, 200);
        let conversion = convert(&img).unwrap();
        assert_eq!(conversion.data.len(), 320 * 200 / 2 + 768);
        assert!(!conversion.palette.is_empty());
        assert_eq!(conversion.palette.colors(), &[BLACK]);
    }
}
