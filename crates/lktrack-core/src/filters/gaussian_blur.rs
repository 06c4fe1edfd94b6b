use ndarray::Array2;

/// Apply a separable Gaussian blur with an explicit odd kernel size.
///
/// Borders are handled by replicating the edge pixel.
pub fn gaussian_blur_array(data: &Array2<f64>, kernel_size: usize, sigma: f64) -> Array2<f64> {
    let kernel = make_gaussian_kernel(kernel_size, sigma);
    let row_pass = convolve_rows(data, &kernel);
    convolve_cols(&row_pass, &kernel)
}

/// Normalised 1D Gaussian taps centred on `kernel_size / 2`.
pub fn make_gaussian_kernel(kernel_size: usize, sigma: f64) -> Vec<f64> {
    let radius = kernel_size / 2;
    let s2 = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / s2).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

fn convolve_rows(data: &Array2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let mut result = Array2::<f64>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0.0;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_col = (col as isize + ki as isize - radius as isize)
                    .clamp(0, w as isize - 1) as usize;
                sum += data[[row, src_col]] * kv;
            }
            result[[row, col]] = sum;
        }
    }
    result
}

fn convolve_cols(data: &Array2<f64>, kernel: &[f64]) -> Array2<f64> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;
    let mut result = Array2::<f64>::zeros((h, w));
    for row in 0..h {
        for col in 0..w {
            let mut sum = 0.0;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_row = (row as isize + ki as isize - radius as isize)
                    .clamp(0, h as isize - 1) as usize;
                sum += data[[src_row, col]] * kv;
            }
            result[[row, col]] = sum;
        }
    }
    result
}
