// Purpose - external interfaces, format conversions

pub mod converter;

/// Average an interleaved buffer down to mono.
pub fn downmix(interleaved: &[f32], channels: usize, out: &mut [f32]) {
    if channels == 0 {
        return;
    }
    let scale = 1.0 / channels as f32;
    for (frame, o) in interleaved.chunks_exact(channels).zip(out.iter_mut()) {
        *o = frame.iter().sum::<f32>() * scale;
    }
}
