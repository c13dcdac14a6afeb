use omniview_image::Image;

/// How a projected coordinate is turned into a pixel index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelRounding {
    /// Round to the closest pixel center, halves away from zero.
    #[default]
    Round,
    /// Take the pixel whose cell contains the coordinate.
    Floor,
}

impl PixelRounding {
    /// Apply the rounding rule to a coordinate.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            PixelRounding::Round => x.round(),
            PixelRounding::Floor => x.floor(),
        }
    }
}

/// Kernel for nearest neighbor lookup
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate (column) of the pixel to look up.
/// * `v` - The y coordinate (row) of the pixel to look up.
/// * `rounding` - The rule turning the coordinates into indices.
///
/// # Returns
///
/// The channels of the pixel, or `None` if the indices fall outside the image.
pub fn nearest_pixel<T, const C: usize>(
    image: &Image<T, C>,
    u: f64,
    v: f64,
    rounding: PixelRounding,
) -> Option<&[T]> {
    let iu = rounding.apply(u);
    let iv = rounding.apply(v);

    // also rejects NaN
    if !(iu >= 0.0 && iv >= 0.0 && iu < image.cols() as f64 && iv < image.rows() as f64) {
        return None;
    }

    image.pixel(iu as usize, iv as usize)
}
