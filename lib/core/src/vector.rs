use serde::{Deserialize, Serialize};
use std::ops::Sub;

/// A dense feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Compute L2 (Euclidean) distance
    #[inline]
    pub fn l2_distance(&self, other: &Vector) -> f32 {
        crate::distance::l2_distance(&self.data, &other.data)
    }

    /// Replace NaN and infinite values with zero, returning the dimensions touched
    pub fn zero_non_finite(&mut self) -> Vec<usize> {
        let mut touched = Vec::new();
        for (i, x) in self.data.iter_mut().enumerate() {
            if !x.is_finite() {
                *x = 0.0;
                touched.push(i);
            }
        }
        touched
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    fn sub(self, other: &Vector) -> Vector {
        let data: Vec<f32> = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a - b)
            .collect();
        Vector::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_distance() {
        let v1 = Vector::new(vec![0.0, 0.0, 0.0]);
        let v2 = Vector::new(vec![3.0, 4.0, 0.0]);
        assert!((v1.l2_distance(&v2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_non_finite() {
        let mut v = Vector::new(vec![1.0, f32::NAN, f32::INFINITY, -2.0]);
        let touched = v.zero_non_finite();
        assert_eq!(touched, vec![1, 2]);
        assert_eq!(v.as_slice(), &[1.0, 0.0, 0.0, -2.0]);
    }

    #[test]
    fn test_sub() {
        let a = Vector::new(vec![3.0, 1.0]);
        let b = Vector::new(vec![1.0, 1.0]);
        assert_eq!((&a - &b).as_slice(), &[2.0, 0.0]);
    }
}
