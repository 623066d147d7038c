use glam::{Mat4, Quat, Vec3};

use crate::Error;
use crate::cursor::ByteCursor;
use crate::keylib::KeyframeLibrary;
use crate::model::{AnimationClip, BoneTrack, RotationKey, Skeleton, TranslationKey};

/// Bytes per clip record in the animation table.
const CLIP_STRIDE: usize = 0x30;

/// Offset of the clip header fields from the start of a clip record.
const CLIP_HEADER_OFFSET: usize = 0x20;

/// Raw key times span the full u16 range over the clip duration.
const TIME_RANGE: f32 = 65535.0;

/// Fixed playback rate handed to hosts. Key times themselves are absolute
/// seconds.
const SAMPLE_RATE: f32 = 30.0;

/// Channel modes, packed into byte 0 of the channel flags. Byte 1 is the key
/// byte width; keys decode only when it is at least 4.
const MODE_ROTATION_FALLBACK: u8 = 0;
const MODE_ROTATION_TRANSLATION: u8 = 1;
const MODE_SKIP: u8 = 2;
const MODE_TRANSLATION_ONLY: u8 = 3;

/// Decodes every clip the skeleton's animation table declares. Channel `k`
/// of a clip always binds to bone `k`; keyframes dereference the shared
/// pools of `keylib`.
pub(crate) fn decode_clips(
    cur: &mut ByteCursor<'_>,
    skeleton: &Skeleton,
    keylib: &KeyframeLibrary,
) -> Result<Vec<AnimationClip>, Error> {
    let mut clips = Vec::with_capacity(skeleton.animation_count as usize);

    for i in 0..skeleton.animation_count as usize {
        let clip_offset = skeleton.animation_table_offset as usize + CLIP_STRIDE * i;
        cur.seek(clip_offset)?;
        let name_len = cur.read_u8()? as usize;
        let name = cur.read_str(name_len)?;

        cur.seek(clip_offset + CLIP_HEADER_OFFSET)?;
        let flags = cur.read_u32()?;
        let channel_count = cur.read_u32()? as usize;
        let duration = cur.read_f32()?;
        let channels_offset = cur.read_u32()? as usize;

        if channel_count > skeleton.bones.len() {
            return Err(Error::Malformed {
                message: format!(
                    "clip {name:?} declares {channel_count} channels for {} bones",
                    skeleton.bones.len()
                ),
            });
        }

        cur.seek(channels_offset)?;
        let mut tracks = Vec::new();
        for bone in 0..channel_count {
            let channel_flags = cur.read_u16()?;
            let key_count = cur.read_u16()? as usize;
            let keys_offset = cur.read_u32()? as usize;

            let mode = (channel_flags & 0xFF) as u8;
            let key_width = (channel_flags >> 8) as u8;

            // Skip channels produce no track and consume no key bytes.
            if mode == MODE_SKIP {
                continue;
            }

            let resume = cur.position();
            cur.seek(keys_offset)?;

            let mut rotations = Vec::new();
            let mut translations = Vec::new();
            if key_width >= 4 {
                for _ in 0..key_count {
                    let raw_time = cur.read_u16()?;
                    let rotation = keylib.rotation(cur.read_u16()? as usize)?;
                    let translation = match mode {
                        MODE_ROTATION_FALLBACK => skeleton.fallback_translations[bone],
                        MODE_ROTATION_TRANSLATION => {
                            keylib.translation(cur.read_u16()? as usize)?
                        }
                        _ => Vec3::ZERO,
                    };

                    let inverse =
                        Mat4::from_rotation_translation(rotation, translation).inverse();
                    let time = raw_time as f32 / TIME_RANGE * duration;

                    if mode == MODE_ROTATION_TRANSLATION || mode == MODE_TRANSLATION_ONLY {
                        translations.push(TranslationKey {
                            time,
                            translation: -inverse.w_axis.truncate(),
                        });
                    }
                    if mode == MODE_ROTATION_FALLBACK || mode == MODE_ROTATION_TRANSLATION {
                        rotations.push(RotationKey {
                            time,
                            rotation: Quat::from_mat4(&inverse),
                        });
                    }
                }
            }
            cur.seek(resume)?;

            tracks.push(BoneTrack {
                bone,
                rotations,
                translations,
            });
        }

        clips.push(AnimationClip {
            name,
            flags,
            duration,
            sample_rate: SAMPLE_RATE,
            tracks,
        });
    }

    Ok(clips)
}
