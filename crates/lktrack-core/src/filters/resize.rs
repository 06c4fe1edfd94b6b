use ndarray::Array2;

/// Output size of a resample by `scale`, never below one pixel.
pub fn scaled_dim(dim: usize, scale: f64) -> usize {
    ((dim as f64 * scale).round() as usize).max(1)
}

/// Area-averaging resample by `scale` (< 1 shrinks).
///
/// Each output pixel is the mean of the input area it covers, with partial
/// pixels weighted by their overlap.
pub fn resize_area(data: &Array2<f64>, scale: f64) -> Array2<f64> {
    let (h, w) = data.dim();
    let new_h = scaled_dim(h, scale);
    let new_w = scaled_dim(w, scale);
    let row_taps = area_taps(h, new_h);
    let col_taps = area_taps(w, new_w);

    let mut result = Array2::<f64>::zeros((new_h, new_w));
    for (r, rt) in row_taps.iter().enumerate() {
        for (c, ct) in col_taps.iter().enumerate() {
            let mut sum = 0.0;
            for &(src_r, wr) in rt {
                for &(src_c, wc) in ct {
                    sum += data[[src_r, src_c]] * wr * wc;
                }
            }
            result[[r, c]] = sum;
        }
    }
    result
}

/// Source indices and overlap weights for every output sample along one axis.
fn area_taps(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f64)>> {
    let footprint = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|out| {
            let start = out as f64 * footprint;
            let end = start + footprint;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|i| {
                    let overlap = end.min(i as f64 + 1.0) - start.max(i as f64);
                    (overlap > 0.0).then_some((i, overlap / footprint))
                })
                .collect()
        })
        .collect()
}
