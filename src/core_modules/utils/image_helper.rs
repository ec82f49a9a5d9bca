// THEORY:
// The image helper is the boundary between files on disk and the clustering
// core. Decoding produces a flat pixel buffer plus dimensions; encoding paints
// every pixel with the color of the cluster it was last assigned to.
//
// A decode failure is an `Err` and never an empty image. A 0x0 image that
// decoded fine is returned as such and callers can check `is_empty`.
// Before painting, the encoder refuses a cluster set whose counts do not add up
// to the number of pixels, or whose labels don't fit the requested dimensions.

pub mod image_helper {
    use std::path::Path;

    use image::{DynamicImage, RgbImage};
    use tracing::debug;

    use crate::core_modules::cluster_set::ClusterSet;
    use crate::core_modules::color::color::Color;
    use crate::error::ImageIoError;
    use crate::pipeline::{KMeansConfig, KMeansPipeline};

    /// A decoded image as the clustering core consumes it.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DecodedImage {
        pub width: u32,
        pub height: u32,
        /// Row-major pixels, `width * height` long.
        pub pixels: Vec<Color>,
    }

    impl DecodedImage {
        pub fn pixel_count(&self) -> usize {
            self.pixels.len()
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }
    }

    pub fn from_dynamic(img: &DynamicImage) -> DecodedImage {
        let rgb = img.to_rgb8();
        DecodedImage {
            width: rgb.width(),
            height: rgb.height(),
            pixels: rgb.pixels().map(|p| Color::from(*p)).collect(),
        }
    }

    pub fn decode(path: impl AsRef<Path>) -> Result<DecodedImage, ImageIoError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(ImageIoError::Decode)?;
        let decoded = from_dynamic(&img);
        debug!(
            path = %path.display(),
            width = decoded.width,
            height = decoded.height,
            "image decoded"
        );
        Ok(decoded)
    }

    /// Paints each pixel with its cluster's color.
    pub fn recolor(width: u32, height: u32, set: &ClusterSet) -> Result<RgbImage, ImageIoError> {
        let expected = width as usize * height as usize;
        if set.labels().len() != expected {
            return Err(ImageIoError::DimensionMismatch {
                width,
                height,
                pixels: set.labels().len(),
            });
        }
        let assigned = set.total_count();
        if assigned != expected {
            return Err(ImageIoError::IntegrityMismatch { assigned, expected });
        }

        let palette = set.palette();
        let mut out = RgbImage::new(width, height);
        for (index, (pixel, &label)) in out.pixels_mut().zip(set.labels()).enumerate() {
            let color = palette.get(label as usize).ok_or(ImageIoError::LabelMismatch {
                index,
                label,
                k: palette.len(),
            })?;
            *pixel = (*color).into();
        }
        Ok(out)
    }

    /// Recolors and saves; the format follows the file extension.
    pub fn encode(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        set: &ClusterSet,
    ) -> Result<(), ImageIoError> {
        let path = path.as_ref();
        let out = recolor(width, height, set)?;
        out.save(path).map_err(ImageIoError::Encode)?;
        debug!(path = %path.display(), k = set.k(), "quantized image written");
        Ok(())
    }

    /// Clusters an in-memory image and returns the recolored result.
    pub fn quantize(
        img: &DynamicImage,
        k: usize,
        config: &KMeansConfig,
    ) -> Result<(RgbImage, ClusterSet), ImageIoError> {
        let decoded = from_dynamic(img);
        let set = KMeansPipeline::new(config.clone()).cluster(
            k,
            &decoded.pixels,
            decoded.pixel_count(),
        )?;
        let out = recolor(decoded.width, decoded.height, &set)?;
        Ok((out, set))
    }
}
