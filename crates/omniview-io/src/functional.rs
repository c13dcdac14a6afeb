use std::path::Path;

use omniview_image::{Image, ImageSize};

use crate::error::IoError;

/// File extensions accepted by the image reader and writer.
const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

fn check_extension(file_path: &Path) -> Result<(), IoError> {
    let supported = file_path.extension().is_some_and(|ext| {
        let ext = ext.to_ascii_lowercase();
        SUPPORTED_EXTENSIONS.iter().any(|s| ext == *s)
    });

    if !supported {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }
    Ok(())
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// Grayscale and RGBA files are converted to RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a JPEG, PNG or BMP image.
///
/// # Returns
///
/// An image containing the decoded pixels.
pub fn read_image_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists and has a known format
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    check_extension(file_path)?;

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?
        .into_rgb8();

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!("read {} image from {}", size, file_path.display());

    Ok(Image::new(size, img.into_raw())?)
}

/// Writes an 8-bit RGB image to the given file path.
///
/// The format is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    check_extension(file_path)?;

    let [width, height]: [u32; 2] = image.size().into();
    image::save_buffer(
        file_path,
        image.as_slice(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;

    log::debug!("wrote {} image to {}", image.size(), file_path.display());

    Ok(())
}
