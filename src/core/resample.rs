use crate::domain::model::{Dimensions, ResampleFilter};
use crate::domain::ports::Resampler;
use crate::utils::error::{ResizeError, Result};
use image::DynamicImage;

/// 以 `image` 的卷積濾鏡縮放到精確的目標尺寸
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterResampler {
    filter: ResampleFilter,
}

impl FilterResampler {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }
}

impl Resampler for FilterResampler {
    fn resample(&self, image: &DynamicImage, target: Dimensions) -> Result<DynamicImage> {
        if target.width == 0 || target.height == 0 {
            return Err(ResizeError::invalid_argument(
                target,
                "cannot resample to an empty image",
            ));
        }

        if image.width() == target.width && image.height() == target.height {
            return Ok(image.clone());
        }

        Ok(image.resize_exact(target.width, target.height, self.filter.filter_type()))
    }
}
