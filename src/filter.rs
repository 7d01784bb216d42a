//! Windowed-sinc FIR design and a FIR filter running over a `DelayLine`.
//!
//! Window equations follow <http://www.labbookpages.co.uk/audio/firWindowing.html>,
//! with `M` the filter order and `n` in `0..=M`.

use std::f32::consts::PI;

use crate::delay_line::DelayLine;
use crate::error::Error;

/// Window applied to the ideal sinc response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WindowType {
    /// `w(n) = 1`
    Rectangular,
    /// `w(n) = 1 - 2|n - M/2| / M`
    Bartlett,
    /// `w(n) = 0.5 - 0.5 cos(2πn/M)`
    Hanning,
    /// `w(n) = 0.54 - 0.46 cos(2πn/M)`
    Hamming,
    /// `w(n) = 0.42 - 0.5 cos(2πn/M) + 0.08 cos(4πn/M)`
    Blackman,
}

/// Frequency response shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterType {
    /// Passes below `cutoff_low`.
    Lowpass,
    /// Passes above `cutoff_low`.
    Highpass,
    /// Passes between `cutoff_low` and `cutoff_high`.
    Bandpass,
    /// Rejects between `cutoff_low` and `cutoff_high`.
    Bandstop,
    /// A pure delay of `order / 2` samples.
    Allpass,
}

/// Filter design parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSpec {
    /// Filter order `M`; the design has `M + 1` taps. Must be even and non-zero
    /// (default: 32)
    pub order: usize,

    /// Window applied to the sinc response (default: Hamming)
    pub window: WindowType,

    /// Response shape (default: Lowpass)
    pub filter_type: FilterType,

    /// Sample rate in Hz (default: 48000.0)
    pub sample_rate: f32,

    /// Cut frequency in Hz; the lower band edge for band filters
    /// (default: 4000.0)
    pub cutoff_low: f32,

    /// Upper band edge in Hz, only used by band filters (default: 8000.0)
    pub cutoff_high: f32,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            order: 32,
            window: WindowType::Hamming,
            filter_type: FilterType::Lowpass,
            sample_rate: 48000.0,
            cutoff_low: 4000.0,
            cutoff_high: 8000.0,
        }
    }
}

impl FilterSpec {
    /// Checks the parameters without designing anything.
    pub fn validate(&self) -> Result<(), Error> {
        if self.order == 0 || self.order % 2 != 0 {
            return Err(Error::Configuration("filter order must be even and greater than zero"));
        }
        if self.filter_type == FilterType::Allpass {
            return Ok(());
        }
        if !(self.sample_rate > 0.0) {
            return Err(Error::Configuration("sample rate must be positive"));
        }
        let nyquist = self.sample_rate / 2.0;
        let in_band = |f: f32| f > 0.0 && f < nyquist;
        match self.filter_type {
            FilterType::Lowpass | FilterType::Highpass => {
                if !in_band(self.cutoff_low) {
                    return Err(Error::Configuration("cut frequency must lie in (0, sample_rate / 2)"));
                }
            }
            FilterType::Bandpass | FilterType::Bandstop => {
                if !in_band(self.cutoff_low) || !in_band(self.cutoff_high) {
                    return Err(Error::Configuration("band edges must lie in (0, sample_rate / 2)"));
                }
                if self.cutoff_low >= self.cutoff_high {
                    return Err(Error::Configuration("lower band edge must be below the upper edge"));
                }
            }
            FilterType::Allpass => {}
        }
        Ok(())
    }

    /// Designs the `order + 1` tap weights: window times sinc, normalised to
    /// unit gain in the pass band.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirrorbuf::filter::{FilterSpec, FilterType, WindowType};
    ///
    /// let spec = FilterSpec {
    ///     order: 4,
    ///     window: WindowType::Hamming,
    ///     filter_type: FilterType::Lowpass,
    ///     sample_rate: 48000.0,
    ///     cutoff_low: 4000.0,
    ///     ..FilterSpec::default()
    /// };
    /// let taps = spec.design().unwrap();
    ///
    /// assert_eq!(taps.len(), 5);
    /// let dc_gain: f32 = taps.iter().sum();
    /// assert!((dc_gain - 1.0).abs() < 1e-5);
    /// ```
    pub fn design(&self) -> Result<Vec<f32>, Error> {
        self.validate()?;

        let (ft1, ft2) = if self.filter_type == FilterType::Allpass {
            (0.0, 0.0)
        } else {
            (self.cutoff_low / self.sample_rate, self.cutoff_high / self.sample_rate)
        };

        let window = window_weights(self.order, self.window);
        let mut taps = sinc_weights(self.order, self.filter_type, ft1, ft2);
        for (tap, w) in taps.iter_mut().zip(window.iter()) {
            *tap *= *w;
        }

        let reference = match self.filter_type {
            FilterType::Lowpass | FilterType::Bandstop | FilterType::Allpass => 0.0,
            // just below Nyquist
            FilterType::Highpass => 0.499,
            FilterType::Bandpass => (ft1 + ft2) / 2.0,
        };
        let gain = gain_at(&taps, reference);
        if !(gain > 0.0) || !gain.is_finite() {
            return Err(Error::Configuration("designed filter has no gain in its pass band"));
        }
        for tap in taps.iter_mut() {
            *tap /= gain;
        }

        log::debug!("designed {:?}/{:?} filter: order={} fs={} fc=({}, {}) gain={}",
                    self.filter_type,
                    self.window,
                    self.order,
                    self.sample_rate,
                    self.cutoff_low,
                    self.cutoff_high,
                    gain);

        Ok(taps)
    }
}

/// Offset of tap `n` from the centre tap `M/2`.
#[inline]
fn centre_offset(n: usize, order: usize) -> f32 {
    n as f32 - (order / 2) as f32
}

/// Returns the `order + 1` weights of `window`.
pub fn window_weights(order: usize, window: WindowType) -> Vec<f32> {
    let m = order as f32;
    let phase = |n: usize| 2.0 * PI * (n as f32 / m);

    match window {
        WindowType::Rectangular => vec![1.0; order + 1],
        WindowType::Bartlett => (0..=order)
            .map(|n| 1.0 - 2.0 * centre_offset(n, order).abs() / m)
            .collect(),
        WindowType::Hanning => (0..=order).map(|n| 0.5 - 0.5 * phase(n).cos()).collect(),
        // 0.54/0.46 rather than 25/46 and 21/46, as fir1 does
        WindowType::Hamming => (0..=order).map(|n| 0.54 - 0.46 * phase(n).cos()).collect(),
        WindowType::Blackman => (0..=order)
            .map(|n| 0.42 - 0.5 * phase(n).cos() + 0.08 * (2.0 * phase(n)).cos())
            .collect(),
    }
}

/// Returns the `order + 1` ideal (unwindowed) sinc weights for normalised
/// frequencies `ft1` and `ft2` (Hz divided by the sample rate).
pub fn sinc_weights(order: usize, filter_type: FilterType, ft1: f32, ft2: f32) -> Vec<f32> {
    let centre = order / 2;
    let sinc = |ft: f32, n: usize| {
        let x = centre_offset(n, order);
        (2.0 * PI * ft * x).sin() / (PI * x)
    };

    (0..=order)
        .map(|n| match (filter_type, n == centre) {
            (FilterType::Lowpass, true) => 2.0 * ft1,
            (FilterType::Lowpass, false) => sinc(ft1, n),
            (FilterType::Highpass, true) => 1.0 - 2.0 * ft1,
            (FilterType::Highpass, false) => -sinc(ft1, n),
            (FilterType::Bandpass, true) => 2.0 * (ft2 - ft1),
            (FilterType::Bandpass, false) => sinc(ft2, n) - sinc(ft1, n),
            (FilterType::Bandstop, true) => 1.0 - 2.0 * (ft2 - ft1),
            (FilterType::Bandstop, false) => sinc(ft1, n) - sinc(ft2, n),
            (FilterType::Allpass, true) => 1.0,
            (FilterType::Allpass, false) => 0.0,
        })
        .collect()
}

/// Magnitude of the frequency response of `taps` at normalised frequency `ft`.
fn gain_at(taps: &[f32], ft: f32) -> f32 {
    let order = taps.len() - 1;
    let (re, im) = taps.iter().enumerate().fold((0.0f32, 0.0f32), |(re, im), (n, &tap)| {
        let w = 2.0 * PI * ft * centre_offset(n, order);
        (re + tap * w.cos(), im - tap * w.sin())
    });
    (re * re + im * im).sqrt()
}

/// A direct-form FIR filter whose input history is a `DelayLine`.
///
/// Each output is the dot product of the taps with the contiguous history
/// window, so no per-tap index wrapping happens on the hot path.
///
/// # Examples
///
/// ```
/// use mirrorbuf::filter::FirFilter;
///
/// let mut fir = FirFilter::new(vec![0.5, 0.5]).unwrap();
/// assert_eq!(fir.process(2.0), 1.0);
/// assert_eq!(fir.process(4.0), 3.0);
/// ```
#[derive(Clone, Debug)]
pub struct FirFilter {
    taps: Vec<f32>,
    history: DelayLine<f32>,
}

impl FirFilter {
    /// Creates a filter with the given taps and a zeroed history.
    ///
    /// Fails with `Error::Configuration` if `taps` is empty.
    pub fn new(taps: Vec<f32>) -> Result<Self, Error> {
        let history = DelayLine::new(taps.len())?;
        Ok(FirFilter { taps, history })
    }

    /// Designs the taps from `spec` and creates the filter.
    pub fn from_spec(spec: &FilterSpec) -> Result<Self, Error> {
        FirFilter::new(spec.design()?)
    }

    /// Returns the taps, tap 0 applying to the newest sample.
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Returns the filter order, one less than the number of taps.
    pub fn order(&self) -> usize {
        self.taps.len() - 1
    }

    /// Pushes one input sample and returns the corresponding output sample.
    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        self.history.append(sample);
        self.taps
            .iter()
            .zip(self.history.iter().rev())
            .map(|(tap, x)| tap * x)
            .sum()
    }

    /// Filters `input` into `output`, sample by sample, and returns the number
    /// of samples produced: the shorter of the two lengths.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) -> usize {
        let n = input.len().min(output.len());
        for (out, &sample) in output[..n].iter_mut().zip(input[..n].iter()) {
            *out = self.process(sample);
        }
        n
    }

    /// Zeroes the input history.
    pub fn reset(&mut self) {
        self.history.clear(0.0);
    }
}
