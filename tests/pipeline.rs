#![cfg(feature = "wav")]

use mirrorbuf::filter::{FilterSpec, FilterType, FirFilter};
use mirrorbuf::{wav, FifoQueue, Wrapping};

const BLOCK: usize = 64;

/// Drains `input` through `fir` into `output` in blocks, reading straight out
/// of the queue's contiguous window.
fn run(fir: &mut FirFilter, input: &mut FifoQueue<f32>, output: &mut FifoQueue<f32>) {
    let mut block = [0.0; BLOCK];
    while !input.is_empty() {
        let n = {
            let chunk = input.peek(BLOCK);
            fir.process_block(chunk, &mut block)
        };
        input.consume(n);
        assert_eq!(output.write(&block[..n]), n);
    }
}

#[test]
fn lowpass_keeps_dc_and_rejects_nyquist() {
    let spec = FilterSpec::default();
    let mut fir = FirFilter::from_spec(&spec).unwrap();
    let taps = fir.taps().len();

    let mut input = FifoQueue::new(1000).unwrap();
    let mut output = FifoQueue::new(1000).unwrap();

    let dc = vec![1.0f32; 300];
    assert_eq!(input.write(&dc), 300);
    run(&mut fir, &mut input, &mut output);

    assert_eq!(output.len(), 300);
    for &y in output.peek(300)[taps..].iter() {
        assert!((y - 1.0).abs() < 1e-3, "dc output {}", y);
    }
    output.clear();

    fir.reset();
    let nyquist: Vec<f32> = (0..300).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    input.write(&nyquist);
    run(&mut fir, &mut input, &mut output);

    let settled = &output.as_slice()[taps..];
    assert!(settled.iter().all(|y| y.abs() < 0.05));
}

#[test]
fn highpass_rejects_dc() {
    let spec = FilterSpec {
        filter_type: FilterType::Highpass,
        ..FilterSpec::default()
    };
    let mut fir = FirFilter::from_spec(&spec).unwrap();
    let taps = fir.taps().len();

    let mut input = FifoQueue::new(256).unwrap();
    let mut output = FifoQueue::new(256).unwrap();
    input.write(&[0.75; 200]);
    run(&mut fir, &mut input, &mut output);

    assert_eq!(output.len(), 200);
    assert!(output.iter().skip(taps).all(|y| y.abs() < 0.01));
}

#[test]
fn filtered_stream_survives_a_wav_round_trip() {
    let mut fir = FirFilter::from_spec(&FilterSpec::default()).unwrap();
    let mut input = FifoQueue::new(512).unwrap();
    let mut output = FifoQueue::new(512).unwrap();

    let tone: Vec<f32> = (0..480)
        .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 48000.0).sin() * 0.5)
        .collect();
    input.write(&tone);
    run(&mut fir, &mut input, &mut output);

    let pcm: Vec<i16> = output.iter().map(|&y| (y * i16::MAX as f32) as i16).collect();
    let bytes = wav::encode_wav(&pcm, 48000).unwrap();
    assert_eq!(wav::decode_wav16(&bytes).unwrap(), pcm);

    // 440 Hz sits well inside the 4 kHz passband.
    let peak = output.iter().skip(100).fold(0.0f32, |m, y| m.max(y.abs()));
    assert!(peak > 0.45 && peak < 0.55, "peak {}", peak);
}

#[test]
fn overwriting_history_keeps_the_latest_samples() {
    let mut history: FifoQueue<i16, Wrapping> = FifoQueue::new(100).unwrap();
    let samples: Vec<i16> = (0..1000).map(|i| i as i16).collect();
    for chunk in samples.chunks(37) {
        assert_eq!(history.write(chunk), chunk.len());
    }
    assert!(history.is_full());
    assert_eq!(history.as_slice(), &samples[900..]);

    let bytes = wav::encode_wav(history.as_slice(), 8000).unwrap();
    let mut restored: FifoQueue<i16> = FifoQueue::new(100).unwrap();
    assert_eq!(restored.write(&wav::decode_wav16(&bytes).unwrap()), 100);
    assert_eq!(restored, history.saturating());
}
