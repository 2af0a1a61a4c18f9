use crate::assets::media::AudioPcm;

/// One source placed on the output timeline.
#[derive(Clone, Debug)]
pub struct AudioSegment {
    /// First output frame covered.
    pub timeline_start_sample: u64,
    /// One past the last output frame covered.
    pub timeline_end_sample: u64,
    /// Source position at `timeline_start_sample`.
    pub source_start_sec: f64,
    /// Source seconds consumed per output second.
    pub playback_rate: f64,
    /// Linear gain.
    pub volume: f32,
    /// Source PCM.
    pub source: AudioPcm,
}

/// Output layout plus every segment that contributes to it.
#[derive(Clone, Debug)]
pub struct AudioManifest {
    /// Output frames per second.
    pub sample_rate: u32,
    /// Output channels (1 or 2).
    pub channels: u16,
    /// Output length in frames.
    pub total_samples: u64,
    /// Contributing segments.
    pub segments: Vec<AudioSegment>,
}

/// Mix all manifest segments into interleaved output PCM, clamped to `[-1, 1]`.
pub(crate) fn mix_manifest(manifest: &AudioManifest) -> Vec<f32> {
    let frames = manifest.total_samples as usize;
    let mut out = vec![0.0f32; frames * usize::from(manifest.channels)];

    for seg in &manifest.segments {
        mix_segment(&mut out, manifest, seg);
    }

    for s in &mut out {
        *s = s.clamp(-1.0, 1.0);
    }
    out
}

fn mix_segment(out: &mut [f32], manifest: &AudioManifest, seg: &AudioSegment) {
    let end = seg.timeline_end_sample.min(manifest.total_samples);
    if end <= seg.timeline_start_sample || seg.volume == 0.0 {
        return;
    }

    let src: &[f32] = seg.source.interleaved.as_slice();
    let src_channels = usize::from(seg.source.channels);
    let src_frames = seg.source.frames();
    if src_frames == 0 {
        return;
    }

    for dst_sample in seg.timeline_start_sample..end {
        let rel_sample = dst_sample - seg.timeline_start_sample;
        let rel_sec = (rel_sample as f64) / f64::from(manifest.sample_rate);

        let src_sec = seg.source_start_sec + rel_sec * seg.playback_rate;
        let src_pos = src_sec * f64::from(seg.source.sample_rate);
        if !src_pos.is_finite() || src_pos < 0.0 {
            break;
        }
        let src_frame0 = src_pos.floor() as usize;
        if src_frame0 >= src_frames {
            break;
        }
        let src_frame1 = (src_frame0 + 1).min(src_frames - 1);
        let frac = (src_pos - src_frame0 as f64) as f32;

        let dst_idx = dst_sample as usize * usize::from(manifest.channels);

        let (l, r) = if src_channels == 1 {
            let v0 = src[src_frame0];
            let v1 = src[src_frame1];
            let v = v0 + ((v1 - v0) * frac);
            (v, v)
        } else {
            let i0 = src_frame0 * src_channels;
            let i1 = src_frame1 * src_channels;
            let l0 = src[i0];
            let l1 = src[i1];
            let r0 = src[i0 + 1];
            let r1 = src[i1 + 1];
            (l0 + ((l1 - l0) * frac), r0 + ((r1 - r0) * frac))
        };

        if manifest.channels > 1 {
            out[dst_idx] += l * seg.volume;
            out[dst_idx + 1] += r * seg.volume;
        } else {
            out[dst_idx] += 0.5 * (l + r) * seg.volume;
        }
    }
}

/// Convert seconds to the nearest frame index at `sample_rate`.
pub(crate) fn secs_to_sample(secs: f64, sample_rate: u32) -> u64 {
    (secs.max(0.0) * f64::from(sample_rate)).round() as u64
}
