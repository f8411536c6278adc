use num::{NumCast, Zero, Float};
use std::{
    fmt::{Debug, Display, LowerExp}, iter::Sum, ops::{Add, AddAssign, Sub, SubAssign}
};

pub trait Primitive: Add + AddAssign + Sum + Sub + SubAssign + Zero + Float + NumCast
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}


/// Copy one point-major record (exactly `DIM` values) out of a flat buffer into a stack-local array.
#[inline(always)]
pub(crate) fn load_point<T: Primitive, const DIM: usize>(src: &[T]) -> [T; DIM] {
    let mut point = [T::zero(); DIM];
    point.copy_from_slice(src);
    point
}

/// Unpack a flat `[<p0>,<p1>,...]` buffer into stack-local records.
pub(crate) fn load_points<T: Primitive, const DIM: usize>(src: &[T]) -> Vec<[T; DIM]> {
    src.chunks_exact(DIM).map(load_point).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_points_is_point_major() {
        let flat = vec![0.0f32, 1.0, 2.0, 10.0, 11.0, 12.0];
        let points: Vec<[f32; 3]> = load_points(&flat);
        assert_eq!(points, vec![[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]]);

        let single: [f64; 2] = load_point(&[4.0, 5.0]);
        assert_eq!(single, [4.0, 5.0]);
    }
}
