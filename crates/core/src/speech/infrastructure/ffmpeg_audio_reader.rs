use std::path::Path;

use ffmpeg_next::format::sample::Type as SampleLayout;
use ffmpeg_next::format::Sample;
use ffmpeg_next::software::resampling;
use ffmpeg_next::util::frame::audio::Audio;

use crate::speech::domain::audio_reader::AudioReader;
use crate::speech::domain::audio_segment::AudioSegment;

/// Decodes uploaded recordings (wav, m4a, webm, ...) with ffmpeg-next and
/// resamples them to mono `f32`.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn read_audio(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Option<AudioSegment>, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;
        let stream_index = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
            Some(stream) => stream.index(),
            None => return Ok(None),
        };

        let parameters = ictx
            .stream(stream_index)
            .ok_or("audio stream disappeared")?
            .parameters();
        let mut decoder = ffmpeg_next::codec::context::Context::from_parameters(parameters)?
            .decoder()
            .audio()?;

        // Some wav encoders leave the layout unset; resampling needs one.
        let source_layout = if decoder.channel_layout().is_empty() {
            ffmpeg_next::ChannelLayout::default(decoder.channels() as i32)
        } else {
            decoder.channel_layout()
        };

        let mut resampler = resampling::Context::get(
            decoder.format(),
            source_layout,
            decoder.rate(),
            Sample::F32(SampleLayout::Packed),
            ffmpeg_next::ChannelLayout::MONO,
            target_sample_rate,
        )?;

        let mut samples = Vec::new();
        for (stream, packet) in ictx.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            drain_decoder(&mut decoder, &mut resampler, &mut samples)?;
        }

        decoder.send_eof()?;
        drain_decoder(&mut decoder, &mut resampler, &mut samples)?;

        let mut tail = Audio::empty();
        if let Ok(Some(delay)) = resampler.flush(&mut tail) {
            if delay.output > 0 {
                append_samples(&tail, &mut samples);
            }
        }

        log::debug!(
            "Decoded {} samples at {target_sample_rate} Hz from {}",
            samples.len(),
            path.display()
        );
        Ok(Some(AudioSegment::new(samples, target_sample_rate)))
    }
}

fn drain_decoder(
    decoder: &mut ffmpeg_next::decoder::Audio,
    resampler: &mut resampling::Context,
    out: &mut Vec<f32>,
) -> Result<(), ffmpeg_next::Error> {
    let mut decoded = Audio::empty();
    let mut resampled = Audio::empty();
    while decoder.receive_frame(&mut decoded).is_ok() {
        resampler.run(&decoded, &mut resampled)?;
        append_samples(&resampled, out);
    }
    Ok(())
}

/// Appends the samples of a packed mono `f32` frame.
fn append_samples(frame: &Audio, out: &mut Vec<f32>) {
    let count = frame.samples();
    if count == 0 {
        return;
    }
    let bytes = &frame.data(0)[..count * std::mem::size_of::<f32>()];
    out.extend(
        bytes
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]])),
    );
}
