use glam::{Mat4, Vec3};

use crate::Error;
use crate::cursor::ByteCursor;
use crate::skeleton::decode_skeleton;
use crate::test_fixtures::{SectionWriter, put_bone, put_skeleton_header};

#[test]
fn bone_records_decode_at_fixed_stride() {
    let mut w = SectionWriter::new();
    put_skeleton_header(&mut w, 2, 5, 0x40, 0x800);
    w.pad_to(0x40);
    put_bone(&mut w, "root", -1, [0.0, 0.0, 0.0, 1.0], [1.0, 2.0, 3.0]);
    put_bone(&mut w, "spine", 0, [0.0, 0.0, 0.0, 1.0], [4.0, 5.0, 6.0]);

    let bytes = w.into_bytes();
    let mut cur = ByteCursor::new(&bytes);
    let skeleton = decode_skeleton(&mut cur).expect("skeleton");

    assert_eq!(skeleton.bones.len(), 2);
    assert_eq!(skeleton.animation_count, 5);

    assert_eq!(skeleton.bones[0].index, 0);
    assert_eq!(skeleton.bones[0].name, "root");
    assert_eq!(skeleton.bones[0].parent, None);
    assert_eq!(skeleton.bones[0].local_transform, Mat4::IDENTITY);
    assert_eq!(skeleton.bones[0].inverse_bind, Mat4::IDENTITY);

    assert_eq!(skeleton.bones[1].index, 1);
    assert_eq!(skeleton.bones[1].name, "spine");
    assert_eq!(skeleton.bones[1].parent, Some(0));

    assert_eq!(skeleton.fallback_translations[0], Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(skeleton.fallback_translations[1], Vec3::new(4.0, 5.0, 6.0));

    assert_eq!(skeleton.bone("spine").map(|b| b.index), Some(1));
    assert!(skeleton.bone("tail").is_none());
}

#[test]
fn oversized_bone_name_is_malformed() {
    let mut w = SectionWriter::new();
    put_skeleton_header(&mut w, 1, 0, 0x40, 0);
    w.pad_to(0x40);
    // Quaternion plus both transforms, then a length byte past the 31-byte
    // name field.
    for _ in 0..36 {
        w.put_f32(0.0);
    }
    w.put_u8(32);
    w.put_bytes(&[b'x'; 40]);

    let bytes = w.into_bytes();
    let mut cur = ByteCursor::new(&bytes);
    assert!(matches!(
        decode_skeleton(&mut cur),
        Err(Error::Malformed { .. })
    ));
}
