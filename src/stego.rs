// Channel-overwrite messaging: one character code per pixel in the red channel, raster order.

use image::codecs::png::PngEncoder;
use image::metadata::Orientation;
use image::{ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Channel that carries the message. Red, the first channel of every pixel.
pub const MESSAGE_CHANNEL: usize = 0;

fn load_image_with_orientation(image_path: &Path) -> Result<RgbaImage, String> {
    let reader = ImageReader::open(image_path).map_err(|e| e.to_string())?;
    let mut decoder = reader.into_decoder().map_err(|e| e.to_string())?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = image::DynamicImage::from_decoder(decoder).map_err(|e| e.to_string())?;
    img.apply_orientation(orientation);
    Ok(img.to_rgba8())
}

/// Number of characters the image can hold: one per pixel.
pub fn capacity(img: &RgbaImage) -> usize {
    img.width() as usize * img.height() as usize
}

/// Write `message` into the red channel of a copy of `cover`, one character
/// code per pixel in raster order (top row first, left to right). The cover
/// itself is never modified, so the caller's original image stays displayable
/// unchanged. The full channel byte is overwritten, so written pixels change
/// color visibly. Characters past the pixel count are silently dropped, and a
/// code point above U+00FF keeps only its low byte. Assumes the caller has
/// already checked that an image and a message were provided.
pub fn embed_message(cover: &RgbaImage, message: &str) -> RgbaImage {
    let mut stego = cover.clone();
    let mut chars = message.chars();
    for pixel in stego.pixels_mut() {
        match chars.next() {
            Some(ch) => pixel[MESSAGE_CHANNEL] = u32::from(ch) as u8,
            None => break,
        }
    }
    stego
}

/// Read the red channel of every pixel back into a string, in the same raster
/// order the encoder writes. Nothing marks where a message ends, so the result
/// always has exactly one character per pixel: a message shorter than the
/// image comes back as a prefix followed by whatever the cover held in that
/// channel.
pub fn extract_message(img: &RgbaImage) -> String {
    img.pixels().map(|p| char::from(p[MESSAGE_CHANNEL])).collect()
}

/// Embed `message` into the image at `image_path` and return PNG bytes.
/// Applies EXIF orientation first so pixel order matches the upright image.
/// Output is always PNG; a lossy re-encode would corrupt the message channel.
pub fn encode(image_path: &Path, message: &str) -> Result<Vec<u8>, String> {
    let cover = load_image_with_orientation(image_path)?;
    let stego = embed_message(&cover, message);
    let (w, h) = (stego.width(), stego.height());

    let mut out = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut out);
    encoder
        .write_image(stego.as_raw(), w, h, ExtendedColorType::Rgba8)
        .map_err(|e: image::ImageError| e.to_string())?;
    Ok(out.into_inner())
}

/// Recover the full-capacity string from the image at `image_path`.
pub fn decode(image_path: &Path) -> Result<String, String> {
    let img = load_image_with_orientation(image_path)?;
    Ok(extract_message(&img))
}

/// How many characters the image at `image_path` can carry.
pub fn max_message_len(image_path: &Path) -> Result<usize, String> {
    let img = load_image_with_orientation(image_path)?;
    Ok(capacity(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn grid(width: u32, height: u32, red: &[u8]) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            let i = (y * width + x) as usize;
            Rgba([red[i], 128, 7, 255])
        })
    }

    fn red_bytes(img: &RgbaImage) -> Vec<u8> {
        img.pixels().map(|p| p[MESSAGE_CHANNEL]).collect()
    }

    #[test]
    fn worked_example_2x2() {
        let cover = grid(2, 2, &[10, 20, 30, 40]);
        let stego = embed_message(&cover, "AB");
        assert_eq!(red_bytes(&stego), vec![65, 66, 30, 40]);

        let text = extract_message(&stego);
        assert_eq!(text.chars().count(), 4);
        let expected: String = ['A', 'B', char::from(30u8), char::from(40u8)].iter().collect();
        assert_eq!(text, expected);
    }

    #[test]
    fn message_comes_back_as_prefix() {
        let cover = grid(4, 3, &[9; 12]);
        let stego = embed_message(&cover, "hello");
        let text = extract_message(&stego);
        assert!(text.starts_with("hello"));
        assert_eq!(text.chars().count(), 12);
    }

    #[test]
    fn tail_keeps_cover_bytes() {
        let red: Vec<u8> = (50..62).collect();
        let cover = grid(4, 3, &red);
        let stego = embed_message(&cover, "hi");
        let text: Vec<char> = extract_message(&stego).chars().collect();
        for (i, &byte) in red.iter().enumerate().skip(2) {
            assert_eq!(text[i], char::from(byte));
        }
    }

    #[test]
    fn only_message_channel_prefix_changes() {
        let cover = grid(3, 3, &[77; 9]);
        let stego = embed_message(&cover, "abc");
        for (i, (before, after)) in cover
            .as_raw()
            .iter()
            .zip(stego.as_raw().iter())
            .enumerate()
        {
            // Red bytes of the first three pixels are the written slots.
            if i % 4 == MESSAGE_CHANNEL && i / 4 < 3 {
                continue;
            }
            assert_eq!(before, after, "byte {i} changed");
        }
    }

    #[test]
    fn long_message_truncates_at_capacity() {
        let cover = grid(2, 2, &[1, 2, 3, 4]);
        let stego = embed_message(&cover, "ABCDEFGH");
        assert_eq!(red_bytes(&stego), vec![65, 66, 67, 68]);
        assert_eq!(stego.as_raw(), embed_message(&cover, "ABCD").as_raw());
    }

    #[test]
    fn cover_is_not_mutated() {
        let cover = grid(2, 2, &[10, 20, 30, 40]);
        let before = cover.as_raw().clone();
        let _ = embed_message(&cover, "XYZW");
        assert_eq!(cover.as_raw(), &before);
    }

    #[test]
    fn extract_is_total_on_any_grid() {
        let red: Vec<u8> = (0..=255).collect();
        let cover = grid(16, 16, &red);
        let text = extract_message(&cover);
        assert_eq!(text.chars().count(), 256);
    }

    #[test]
    fn deterministic() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let red: Vec<u8> = (0..30).map(|_| rng.gen()).collect();
        let cover = grid(6, 5, &red);

        let a = embed_message(&cover, "same input");
        let b = embed_message(&cover, "same input");
        assert_eq!(a.as_raw(), b.as_raw());
        assert_eq!(extract_message(&a), extract_message(&b));
    }

    #[test]
    fn high_code_point_aliases_low_byte() {
        // U+0151 stores 0x51 and reads back as 'Q'.
        let cover = grid(2, 1, &[0, 0]);
        let stego = embed_message(&cover, "\u{151}");
        assert_eq!(red_bytes(&stego)[0], 0x51);
        assert_eq!(extract_message(&stego).chars().next(), Some('Q'));
    }

    #[test]
    fn empty_grid_degrades_to_empty_string() {
        let empty = RgbaImage::new(0, 0);
        assert_eq!(capacity(&empty), 0);
        assert_eq!(extract_message(&empty), "");
        let stego = embed_message(&empty, "ignored");
        assert_eq!(stego.dimensions(), (0, 0));
    }

    #[test]
    fn empty_message_copies_cover_unchanged() {
        let cover = grid(3, 2, &[5, 6, 7, 8, 9, 10]);
        let stego = embed_message(&cover, "");
        assert_eq!(stego.as_raw(), cover.as_raw());
    }

    #[test]
    fn capacity_is_pixel_count() {
        let cover = grid(7, 4, &[0; 28]);
        assert_eq!(capacity(&cover), 28);
    }
}
