use std::borrow::Cow;

use gif::{ColorOutput, DecodeOptions, DisposalMethod, Repeat};
use pixelflow::image_pipeline::{
    AnimationConfig, AnimationMode, AnimationPipeline, Bgra, ColorMatrix, ColorMatrixFilter,
    ParallelTransform, ProcessingError, Raster, TransformOptions,
};

const RED: [u8; 3] = [255, 0, 0];
const BLUE: [u8; 3] = [0, 0, 255];

struct SourceFrame {
    left: u16,
    top: u16,
    size: u16,
    color: [u8; 3],
    delay: u16,
    dispose: DisposalMethod,
}

fn build_gif(frames: &[SourceFrame], repeat: Option<Repeat>) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut bytes, 4, 4, &[]).unwrap();
        if let Some(repeat) = repeat {
            encoder.set_repeat(repeat).unwrap();
        }
        for source in frames {
            let mut palette = source.color.to_vec();
            palette.extend_from_slice(&[0, 0, 0]);
            let frame = gif::Frame {
                left: source.left,
                top: source.top,
                width: source.size,
                height: source.size,
                delay: source.delay,
                dispose: source.dispose,
                palette: Some(palette),
                buffer: Cow::Owned(vec![0; source.size as usize * source.size as usize]),
                ..gif::Frame::default()
            };
            encoder.write_frame(&frame).unwrap();
        }
    }
    bytes
}

fn full_frames(delays: &[u16]) -> Vec<SourceFrame> {
    delays
        .iter()
        .map(|&delay| SourceFrame {
            left: 0,
            top: 0,
            size: 4,
            color: RED,
            delay,
            dispose: DisposalMethod::Keep,
        })
        .collect()
}

struct DecodedFrame {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    delay: u16,
    rgba: Vec<u8>,
}

fn read_gif(bytes: &[u8]) -> (Vec<DecodedFrame>, Repeat) {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);
    let mut decoder = options.read_info(bytes).unwrap();
    let mut frames = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        frames.push(DecodedFrame {
            left: frame.left,
            top: frame.top,
            width: frame.width,
            height: frame.height,
            delay: frame.delay,
            rgba: frame.buffer.to_vec(),
        });
    }
    (frames, decoder.repeat())
}

fn pixel(frame: &DecodedFrame, x: usize, y: usize) -> [u8; 4] {
    let offset = (y * frame.width as usize + x) * 4;
    frame.rgba[offset..offset + 4].try_into().unwrap()
}

#[test]
fn test_no_op_pass_preserves_frames_delays_and_loop() {
    let input = build_gif(&full_frames(&[10, 20, 10]), Some(Repeat::Infinite));
    let pipeline = AnimationPipeline::new(AnimationConfig::default());

    let output = pipeline.process(&input, Ok).unwrap();

    let (frames, repeat) = read_gif(&output);
    assert_eq!(frames.len(), 3);
    assert_eq!(frames.iter().map(|f| f.delay).collect::<Vec<_>>(), vec![10, 20, 10]);
    assert_eq!(repeat, Repeat::Infinite);
    assert!(frames.iter().all(|f| pixel(f, 3, 3) == [255, 0, 0, 255]));
}

#[test]
fn test_finite_loop_count_is_forwarded() {
    let input = build_gif(&full_frames(&[5, 5]), Some(Repeat::Finite(3)));

    let output = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, Ok)
        .unwrap();

    let (_, repeat) = read_gif(&output);
    assert_eq!(repeat, Repeat::Finite(3));
}

#[test]
fn test_missing_loop_extension_plays_once() {
    let input = build_gif(&full_frames(&[5]), None);

    let output = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, Ok)
        .unwrap();

    let (_, repeat) = read_gif(&output);
    assert_eq!(repeat, Repeat::Finite(0));
}

#[test]
fn test_color_matrix_is_applied_to_every_frame() {
    let input = build_gif(&full_frames(&[4, 8]), Some(Repeat::Infinite));
    let engine = ParallelTransform::new(TransformOptions::default()).unwrap();
    let invert = ColorMatrixFilter::new(ColorMatrix::invert(), false);

    let output = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, |raster| invert.process(&engine, raster))
        .unwrap();

    let (frames, _) = read_gif(&output);
    assert_eq!(frames.len(), 2);
    for frame in &frames {
        assert_eq!(pixel(frame, 0, 0), [0, 255, 255, 255]);
    }
}

fn overlay_frames() -> Vec<SourceFrame> {
    vec![
        SourceFrame {
            left: 0,
            top: 0,
            size: 4,
            color: RED,
            delay: 10,
            dispose: DisposalMethod::Keep,
        },
        SourceFrame {
            left: 1,
            top: 1,
            size: 2,
            color: BLUE,
            delay: 20,
            dispose: DisposalMethod::Keep,
        },
    ]
}

#[test]
fn test_composite_mode_emits_full_screen_frames() {
    let input = build_gif(&overlay_frames(), Some(Repeat::Infinite));
    let config = AnimationConfig::builder().mode(AnimationMode::Composite).build();
    let mut sizes = Vec::new();

    let output = AnimationPipeline::new(config)
        .process(&input, |raster| {
            sizes.push((raster.width(), raster.height()));
            Ok(raster)
        })
        .unwrap();

    assert_eq!(sizes, vec![(4, 4), (4, 4)]);
    let (frames, _) = read_gif(&output);
    let second = &frames[1];
    assert_eq!((second.left, second.top, second.width, second.height), (0, 0, 4, 4));
    assert_eq!(pixel(second, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(second, 1, 1), [0, 0, 255, 255]);
}

#[test]
fn test_delta_mode_keeps_stored_sub_rectangles() {
    let input = build_gif(&overlay_frames(), Some(Repeat::Infinite));
    let config = AnimationConfig::builder().mode(AnimationMode::Delta).build();

    let output = AnimationPipeline::new(config).process(&input, Ok).unwrap();

    let (frames, _) = read_gif(&output);
    let second = &frames[1];
    assert_eq!((second.left, second.top, second.width, second.height), (1, 1, 2, 2));
    assert_eq!(second.delay, 20);
}

#[test]
fn test_transparent_pixels_survive_quantization() {
    let input = build_gif(&full_frames(&[3]), None);
    let output = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, |mut raster| {
            raster.set(0, 0, Bgra::TRANSPARENT);
            Ok(raster)
        })
        .unwrap();

    let (frames, _) = read_gif(&output);
    assert_eq!(pixel(&frames[0], 0, 0)[3], 0);
    assert_eq!(pixel(&frames[0], 1, 0), [255, 0, 0, 255]);
}

#[test]
fn test_malformed_input_is_a_decode_error() {
    let mut calls = 0;
    let result = AnimationPipeline::new(AnimationConfig::default()).process(b"not a gif", |raster| {
        calls += 1;
        Ok(raster)
    });

    assert!(matches!(result, Err(ProcessingError::DecodeError(_))));
    assert_eq!(calls, 0);
}

fn composite_frames(frames: &[SourceFrame]) -> Vec<DecodedFrame> {
    let input = build_gif(frames, Some(Repeat::Infinite));
    let config = AnimationConfig::builder().mode(AnimationMode::Composite).build();
    let output = AnimationPipeline::new(config).process(&input, Ok).unwrap();
    read_gif(&output).0
}

#[test]
fn test_background_disposal_clears_the_frame_area() {
    let mut frames = overlay_frames();
    frames[0].dispose = DisposalMethod::Background;

    let decoded = composite_frames(&frames);

    let second = &decoded[1];
    assert_eq!((second.width, second.height), (4, 4));
    assert_eq!(pixel(second, 0, 0)[3], 0);
    assert_eq!(pixel(second, 3, 3)[3], 0);
    assert_eq!(pixel(second, 1, 1), [0, 0, 255, 255]);
}

#[test]
fn test_previous_disposal_restores_the_canvas() {
    let mut frames = overlay_frames();
    frames[1].dispose = DisposalMethod::Previous;
    frames.push(SourceFrame {
        left: 0,
        top: 0,
        size: 1,
        color: BLUE,
        delay: 30,
        dispose: DisposalMethod::Keep,
    });

    let decoded = composite_frames(&frames);

    assert_eq!(decoded.len(), 3);
    // The blue overlay is visible in its own frame only.
    assert_eq!(pixel(&decoded[1], 1, 1), [0, 0, 255, 255]);
    let third = &decoded[2];
    assert_eq!(pixel(third, 0, 0), [0, 0, 255, 255]);
    assert_eq!(pixel(third, 1, 1), [255, 0, 0, 255]);
    assert_eq!(pixel(third, 2, 2), [255, 0, 0, 255]);
}

/// A 16x16 animation whose frames carry enough image data to be cut mid-frame.
fn noisy_gif(frame_count: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut bytes, 16, 16, &[]).unwrap();
        encoder.set_repeat(Repeat::Infinite).unwrap();
        for index in 0..frame_count {
            let buffer = (0..256usize)
                .map(|i| (((i * 31) ^ (i >> 3) ^ index) % 4) as u8)
                .collect::<Vec<_>>();
            let frame = gif::Frame {
                width: 16,
                height: 16,
                delay: 10,
                palette: Some(vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255]),
                buffer: Cow::Owned(buffer),
                ..gif::Frame::default()
            };
            encoder.write_frame(&frame).unwrap();
        }
    }
    bytes
}

#[test]
fn test_truncated_last_frame_fails_before_any_processing() {
    let mut input = noisy_gif(3);
    input.truncate(input.len() - 20);
    let mut calls = 0;

    let result = AnimationPipeline::new(AnimationConfig::default()).process(&input, |raster| {
        calls += 1;
        Ok(raster)
    });

    assert!(matches!(result, Err(ProcessingError::DecodeError(_))));
    assert_eq!(calls, 0);
}

#[test]
fn test_intact_noisy_animation_decodes_fully() {
    let input = noisy_gif(3);

    let output = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, Ok)
        .unwrap();

    assert_eq!(read_gif(&output).0.len(), 3);
}

#[test]
fn test_oversized_processed_frame_fails_to_encode() {
    let input = build_gif(&full_frames(&[1]), Some(Repeat::Infinite));

    let result = AnimationPipeline::new(AnimationConfig::default())
        .process(&input, |_| Ok(Raster::new(8, 8)));

    assert!(matches!(result, Err(ProcessingError::EncodeError(_))));
}

#[test]
fn test_process_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.gif");
    let output_path = dir.path().join("output.gif");
    std::fs::write(&input_path, build_gif(&full_frames(&[10, 20, 10]), Some(Repeat::Infinite))).unwrap();

    AnimationPipeline::new(AnimationConfig::default())
        .process_file(&input_path, &output_path, Ok)
        .unwrap();

    let (frames, repeat) = read_gif(&std::fs::read(&output_path).unwrap());
    assert_eq!(frames.len(), 3);
    assert_eq!(repeat, Repeat::Infinite);
}

#[test]
fn test_failed_processing_writes_no_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.gif");
    let output_path = dir.path().join("output.gif");
    std::fs::write(&input_path, build_gif(&full_frames(&[10, 20]), Some(Repeat::Infinite))).unwrap();

    let result = AnimationPipeline::new(AnimationConfig::default()).process_file(
        &input_path,
        &output_path,
        |_| Err(ProcessingError::processor("stop")),
    );

    assert!(matches!(result, Err(ProcessingError::ProcessorError(_))));
    assert!(!output_path.exists());
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    let result = AnimationPipeline::new(AnimationConfig::default()).process_file(
        dir.path().join("missing.gif"),
        dir.path().join("out.gif"),
        Ok,
    );

    assert!(matches!(result, Err(ProcessingError::InputReadError(_))));
}
