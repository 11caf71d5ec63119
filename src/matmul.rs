//! The two matrix products of the forward/gradient pass.
//!
//! Both read operands in their stored row-major layout; the transposes are
//! expressed through strides (with the `matrixmultiply` feature) or through the
//! loop order of the fallback.

/// `out = X · Wᵗ` with `X: (len, n_feature)`, `W: (n_category, n_feature)` and
/// `out: (len, n_category)`.
pub(crate) fn scores_into(
    x: &[f64],
    w: &[f64],
    len: usize,
    n_feature: usize,
    n_category: usize,
    out: &mut [f64],
) {
    debug_assert_eq!(x.len(), len * n_feature);
    debug_assert_eq!(w.len(), n_category * n_feature);
    debug_assert_eq!(out.len(), len * n_category);

    #[cfg(feature = "matrixmultiply")]
    {
        let mm = Dgemm {
            m: len,
            k: n_feature,
            n: n_category,
            a: (x, n_feature, 1),
            b: (w, 1, n_feature),
        };
        mm.run(1.0, out, n_category);
    }

    #[cfg(not(feature = "matrixmultiply"))]
    for (x_row, out_row) in x.chunks_exact(n_feature).zip(out.chunks_exact_mut(n_category)) {
        for (o, w_row) in out_row.iter_mut().zip(w.chunks_exact(n_feature)) {
            *o = x_row.iter().zip(w_row).fold(0.0, |acc, (&a, &b)| a.mul_add(b, acc));
        }
    }
}

/// `out = scale · Δᵗ · X` with `Δ: (len, n_category)`, `X: (len, n_feature)` and
/// `out: (n_category, n_feature)`.
pub(crate) fn weight_gradient_into(
    delta: &[f64],
    x: &[f64],
    len: usize,
    n_category: usize,
    n_feature: usize,
    scale: f64,
    out: &mut [f64],
) {
    debug_assert_eq!(delta.len(), len * n_category);
    debug_assert_eq!(x.len(), len * n_feature);
    debug_assert_eq!(out.len(), n_category * n_feature);

    #[cfg(feature = "matrixmultiply")]
    {
        let mm = Dgemm {
            m: n_category,
            k: len,
            n: n_feature,
            a: (delta, 1, n_category),
            b: (x, n_feature, 1),
        };
        mm.run(scale, out, n_feature);
    }

    #[cfg(not(feature = "matrixmultiply"))]
    {
        out.fill(0.0);
        // Accumulate one record at a time so both inputs are read row by row.
        for (d_row, x_row) in delta.chunks_exact(n_category).zip(x.chunks_exact(n_feature)) {
            for (&d, out_row) in d_row.iter().zip(out.chunks_exact_mut(n_feature)) {
                for (o, &v) in out_row.iter_mut().zip(x_row) {
                    *o = d.mul_add(v, *o);
                }
            }
        }
        for o in out.iter_mut() {
            *o *= scale;
        }
    }
}

/// Strided operands for `matrixmultiply::dgemm`: `(buffer, row stride, col stride)`.
#[cfg(feature = "matrixmultiply")]
struct Dgemm<'a> {
    m: usize,
    k: usize,
    n: usize,
    a: (&'a [f64], usize, usize),
    b: (&'a [f64], usize, usize),
}

#[cfg(feature = "matrixmultiply")]
impl Dgemm<'_> {
    /// `c = alpha · A·B` into a row-major `c` with row stride `rsc`.
    fn run(&self, alpha: f64, c: &mut [f64], rsc: usize) {
        let (a, rsa, csa) = self.a;
        let (b, rsb, csb) = self.b;
        debug_assert!((self.m - 1) * rsa + (self.k - 1) * csa < a.len());
        debug_assert!((self.k - 1) * rsb + (self.n - 1) * csb < b.len());
        debug_assert!((self.m - 1) * rsc + self.n - 1 < c.len());

        // SAFETY: every strided index lies inside its buffer (checked above in
        // debug builds) and `c` is a distinct mutable borrow.
        unsafe {
            matrixmultiply::dgemm(
                self.m,
                self.k,
                self.n,
                alpha,
                a.as_ptr(),
                rsa as isize,
                csa as isize,
                b.as_ptr(),
                rsb as isize,
                csb as isize,
                0.0,
                c.as_mut_ptr(),
                rsc as isize,
                1,
            );
        }
    }
}
