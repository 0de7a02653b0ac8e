//! Random-Phase Assignment and Inverse Transform

use crate::Spectrum;
use rand::Rng;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::debug;

/// Gain applied when the two quadrature outputs are blended into one series
const QUADRATURE_GAIN: f64 = 2.0;

/// Inverse transform implementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Mixed-radix FFT, O(N log N)
    #[default]
    Fft,
    /// Direct evaluation of the DFT sum, O(N²)
    Direct,
}

/// Spectrum magnitudes carrying i.i.d. uniform random phases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasedSignal {
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl PhasedSignal {
    /// Draw one phase in [0, 2π) per bin from `rng` and apply it to the spectrum
    pub fn randomize<R: Rng + ?Sized>(spectrum: &Spectrum, rng: &mut R) -> Self {
        let (real, imag) = spectrum
            .magnitude()
            .iter()
            .map(|&s| {
                let phase = TAU * rng.gen::<f64>();
                (s * phase.cos(), s * phase.sin())
            })
            .unzip();

        Self { real, imag }
    }

    /// Real parts per bin
    pub fn real(&self) -> &[f64] {
        &self.real
    }

    /// Imaginary parts per bin
    pub fn imag(&self) -> &[f64] {
        &self.imag
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.real.len()
    }

    /// Check if there are no bins
    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    fn to_complex(&self) -> Vec<Complex<f64>> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }
}

/// Both components of the inverse transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadratureSignal {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl QuadratureSignal {
    /// Blend the quadratures into one real series: `(real + imag) * 2`
    pub fn combine(&self) -> Vec<f64> {
        self.real
            .iter()
            .zip(&self.imag)
            .map(|(&re, &im)| (re + im) * QUADRATURE_GAIN)
            .collect()
    }
}

/// Inverse DFT normalized by `1/N`: `x[n] = (1/N) Σ X[k]·e^{+2πikn/N}`
pub struct InverseTransform {
    /// FFT planner, reused across calls
    planner: FftPlanner<f64>,
    kind: TransformKind,
}

impl InverseTransform {
    /// Create a new inverse transform of the given kind
    pub fn new(kind: TransformKind) -> Self {
        Self {
            planner: FftPlanner::new(),
            kind,
        }
    }

    /// Transform kind in use
    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    /// Inverse-transform the phased spectrum
    pub fn process(&mut self, signal: &PhasedSignal) -> QuadratureSignal {
        if signal.is_empty() {
            return QuadratureSignal {
                real: Vec::new(),
                imag: Vec::new(),
            };
        }

        let n = signal.len();
        let mut buffer = signal.to_complex();

        match self.kind {
            TransformKind::Fft => {
                // rustfft leaves the inverse unnormalized
                let ifft = self.planner.plan_fft_inverse(n);
                ifft.process(&mut buffer);
            }
            TransformKind::Direct => buffer = direct_inverse(&buffer),
        }

        debug!("Inverse transform ({:?}) over {} bins", self.kind, n);

        let norm = 1.0 / n as f64;
        let (real, imag) = buffer.iter().map(|c| (c.re * norm, c.im * norm)).unzip();
        QuadratureSignal { real, imag }
    }
}

/// Unnormalized inverse DFT by direct summation
fn direct_inverse(input: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let n = input.len() as u64;
    (0..n)
        .map(|t| {
            input
                .iter()
                .enumerate()
                .map(|(k, &x)| {
                    // Reduce k·t modulo N before scaling to keep the angle small
                    let turns = (k as u64 * t) % n;
                    x * Complex::from_polar(1.0, TAU * turns as f64 / n as f64)
                })
                .sum::<Complex<f64>>()
        })
        .collect()
}
