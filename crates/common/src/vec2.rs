use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::ops::{Index, IndexMut};

/// Row-major dense matrix. Row `i` occupies `base[i * dims..(i + 1) * dims]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vec2<T> {
    shape: (usize, usize),
    base: Vec<T>,
}

impl<T: Default + Copy> Vec2<T> {
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            shape,
            base: vec![T::default(); shape.0 * shape.1],
        }
    }
    /// Like [`Vec2::zeros`], but reports allocation exhaustion instead of aborting.
    pub fn try_zeros(shape: (usize, usize)) -> Result<Self, TryReserveError> {
        let len = shape.0.saturating_mul(shape.1);
        let mut base = Vec::new();
        base.try_reserve_exact(len)?;
        base.resize(len, T::default());
        Ok(Self { shape, base })
    }
    pub fn from_vec(shape: (usize, usize), base: Vec<T>) -> Self {
        assert_eq!(shape.0 * shape.1, base.len());
        Self { shape, base }
    }
    pub fn from_rows<R: AsRef<[T]>>(dims: usize, rows: &[R]) -> Self {
        let mut base = Vec::with_capacity(rows.len() * dims);
        for row in rows {
            assert_eq!(row.as_ref().len(), dims);
            base.extend_from_slice(row.as_ref());
        }
        Self {
            shape: (rows.len(), dims),
            base,
        }
    }
    pub fn fill(&mut self, value: T) {
        self.base.fill(value);
    }
}

impl<T> Vec2<T> {
    pub fn shape_0(&self) -> usize {
        self.shape.0
    }
    pub fn shape_1(&self) -> usize {
        self.shape.1
    }
    pub fn is_empty(&self) -> bool {
        self.shape.0 == 0
    }
    pub fn as_slice(&self) -> &[T] {
        self.base.as_slice()
    }
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.base.as_mut_slice()
    }
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.shape.0).map(move |i| &self[(i,)])
    }
    pub fn into_vec(self) -> Vec<T> {
        self.base
    }
}

impl<T> Index<(usize,)> for Vec2<T> {
    type Output = [T];

    fn index(&self, (i,): (usize,)) -> &Self::Output {
        &self.base[i * self.shape.1..][..self.shape.1]
    }
}

impl<T> IndexMut<(usize,)> for Vec2<T> {
    fn index_mut(&mut self, (i,): (usize,)) -> &mut Self::Output {
        &mut self.base[i * self.shape.1..][..self.shape.1]
    }
}

impl<T> Index<(usize, usize)> for Vec2<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.base[i * self.shape.1..][j]
    }
}

impl<T> IndexMut<(usize, usize)> for Vec2<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        &mut self.base[i * self.shape.1..][j]
    }
}
