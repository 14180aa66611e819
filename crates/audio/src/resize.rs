//! Билинейный ресайз спектрограммы и min-max нормализация.

use resp_core::FeatureImage;

/// Билинейный ресайз матрицы [rows][cols] до out_rows×out_cols
/// (half-pixel centers). Возвращает row-major буфер.
pub fn bilinear_resize(
    matrix: &[Vec<f32>],
    out_rows: usize,
    out_cols: usize,
) -> Vec<f32> {
    let in_rows = matrix.len();
    let in_cols = if in_rows > 0 { matrix[0].len() } else { 0 };
    let mut out = vec![0.0f32; out_rows * out_cols];

    if in_rows == 0 || in_cols == 0 {
        return out;
    }

    let row_scale = in_rows as f32 / out_rows as f32;
    let col_scale = in_cols as f32 / out_cols as f32;

    for r in 0..out_rows {
        let src_r = ((r as f32 + 0.5) * row_scale - 0.5).clamp(0.0, (in_rows - 1) as f32);
        let r0 = src_r.floor() as usize;
        let r1 = (r0 + 1).min(in_rows - 1);
        let fr = src_r - r0 as f32;

        for c in 0..out_cols {
            let src_c = ((c as f32 + 0.5) * col_scale - 0.5).clamp(0.0, (in_cols - 1) as f32);
            let c0 = src_c.floor() as usize;
            let c1 = (c0 + 1).min(in_cols - 1);
            let fc = src_c - c0 as f32;

            let top = matrix[r0][c0] * (1.0 - fc) + matrix[r0][c1] * fc;
            let bottom = matrix[r1][c0] * (1.0 - fc) + matrix[r1][c1] * fc;
            out[r * out_cols + c] = top * (1.0 - fr) + bottom * fr;
        }
    }

    out
}

/// Min-max нормализация в [0, 1].
///
/// Константный вход (max == min) — условие деградации: деление на ноль
/// не выполняется, возвращается `None`.
pub fn min_max_normalize(mut data: Vec<f32>, size: usize) -> Option<FeatureImage> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in &data {
        if !v.is_finite() {
            return None;
        }
        min = min.min(v);
        max = max.max(v);
    }

    if !(max > min) {
        return None;
    }

    let range = max - min;
    for v in data.iter_mut() {
        *v = (*v - min) / range;
    }

    FeatureImage::new(data, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_identity() {
        // Ресайз в собственный размер не меняет значения.
        let m = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let out = bilinear_resize(&m, 2, 2);
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_bilinear_upscale_midpoint() {
        // 1×2 → 1×4: центральные выборки интерполируются между 0 и 1.
        let m = vec![vec![0.0, 1.0]];
        let out = bilinear_resize(&m, 1, 4);
        assert_eq!(out.len(), 4);
        assert!(out[0] < out[1] && out[1] < out[2] && out[2] < out[3]);
        assert!((out[1] - 0.375).abs() < 1e-6);
        assert!((out[2] - 0.625).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_downscale_average() {
        // 1×4 → 1×2 с half-pixel centers: среднее соседних пар.
        let m = vec![vec![0.0, 2.0, 4.0, 6.0]];
        let out = bilinear_resize(&m, 1, 2);
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_min_max_normalize_range() {
        let img = min_max_normalize(vec![-3.0, 0.0, 5.0, 1.0], 2).unwrap();
        let s = img.as_slice();
        assert_eq!(s[0], 0.0);
        assert_eq!(s[2], 1.0);
        assert!(s.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_min_max_normalize_constant_is_degenerate() {
        assert!(min_max_normalize(vec![2.5; 4], 2).is_none());
        assert!(min_max_normalize(vec![0.0; 4], 2).is_none());
    }

    #[test]
    fn test_min_max_normalize_nonfinite_is_degenerate() {
        assert!(min_max_normalize(vec![0.0, f32::NAN, 1.0, 2.0], 2).is_none());
    }
}
