use crate::domain::model::Dimensions;
use crate::utils::error::{ResizeError, Result};

/// 壓縮貼圖要求的邊長倍數
pub const TEXTURE_ALIGNMENT: i64 = 4;

/// 不超過此值的邊長原樣保留（1px / 2px 的細線或遮罩貼圖）
pub const PRESERVED_MAX: i64 = 2;

/// 將單一邊長調整為可壓縮貼圖的尺寸。
///
/// - `val <= 2`：原樣回傳
/// - 餘數 0：不變；餘數 1、2：往下取；餘數 3：往上補到 4 的倍數
///
/// 負數不是合法的邊長，回傳 `InvalidArgument`。
pub fn round_to_texture_dimension(val: i64) -> Result<i64> {
    if val < 0 {
        return Err(ResizeError::invalid_argument(
            val,
            "dimension must be non-negative",
        ));
    }

    if val <= PRESERVED_MAX {
        return Ok(val);
    }

    let rem = val % TEXTURE_ALIGNMENT;
    match rem {
        0 => Ok(val),
        1 | 2 => Ok(val - rem),
        _ => val
            .checked_add(TEXTURE_ALIGNMENT - rem)
            .ok_or_else(|| ResizeError::invalid_argument(val, "dimension too large to round up")),
    }
}

fn round_pixel_length(val: u32) -> Result<u32> {
    let rounded = round_to_texture_dimension(i64::from(val))?;
    u32::try_from(rounded)
        .map_err(|_| ResizeError::invalid_argument(val, "rounded dimension exceeds u32"))
}

/// 對寬高分別套用 [`round_to_texture_dimension`]
pub fn target_dimensions(original: Dimensions) -> Result<Dimensions> {
    Ok(Dimensions::new(
        round_pixel_length(original.width)?,
        round_pixel_length(original.height)?,
    ))
}
