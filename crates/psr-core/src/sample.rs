//! Timestamped readings

use serde::{Deserialize, Serialize};

use crate::timestamp::SessionTime;

/// A single reading's value: one scalar, or one fixed-width vector
///
/// The shape is a property of the channel, resolved once when a channel is
/// created or loaded; every sample in a channel carries the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Single reading (GSR conductance, PPG intensity, ...)
    Scalar(f64),
    /// Multi-component reading (one value per electrode or axis)
    Vector(Vec<f64>),
}

impl SampleValue {
    /// Number of components in this value
    pub fn width(&self) -> usize {
        match self {
            SampleValue::Scalar(_) => 1,
            SampleValue::Vector(v) => v.len(),
        }
    }

    /// The scalar reading, if this value is scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SampleValue::Scalar(v) => Some(*v),
            SampleValue::Vector(_) => None,
        }
    }

    /// All components in order, regardless of shape
    pub fn components(&self) -> &[f64] {
        match self {
            SampleValue::Scalar(v) => core::slice::from_ref(v),
            SampleValue::Vector(v) => v.as_slice(),
        }
    }
}

/// An immutable timestamped reading from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Elapsed time since the producing source started
    pub t: SessionTime,
    /// The reading itself
    pub v: SampleValue,
}

impl Sample {
    /// Create a scalar sample
    pub fn scalar(t: SessionTime, value: f64) -> Self {
        Sample {
            t,
            v: SampleValue::Scalar(value),
        }
    }

    /// Create a vector sample
    pub fn vector(t: SessionTime, values: Vec<f64>) -> Self {
        Sample {
            t,
            v: SampleValue::Vector(values),
        }
    }
}
