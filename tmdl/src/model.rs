use glam::{Mat4, Quat, Vec2, Vec3};

/// A material slot: the in-file material name plus the texture file it
/// references. Binding textures to renderable materials is host territory.
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub texture_name: String,
}

/// Per-vertex skinning data: four resolved bone indices and the matching
/// weights. Weights are the raw `byte / 255` values, not renormalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexWeights {
    pub bones: [u32; 4],
    pub weights: [f32; 4],
}

/// A decoded mesh. `indices` is an explicit triangle list (length a multiple
/// of three) reconstructed from the file's triangle strips; `weights` is
/// present for skinned meshes only.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub material_name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub weights: Option<Vec<VertexWeights>>,
}

#[derive(Clone, Debug)]
pub struct Bone {
    pub index: usize,
    pub name: String,
    /// `None` for root bones (`-1` on the wire). Parents always precede
    /// their children in the bone array.
    pub parent: Option<usize>,
    /// Rest transform. The wire stores a full 4x4 whose last row is the
    /// homogeneous 0,0,0,1.
    pub local_transform: Mat4,
    pub inverse_bind: Mat4,
}

/// The decoded bone hierarchy plus the per-bone fallback transforms the
/// animation decoder draws on. Fallbacks are side tables, not part of the
/// rest pose.
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
    pub fallback_rotations: Vec<Quat>,
    pub fallback_translations: Vec<Vec3>,
    /// Number of clips the animation table declares.
    pub animation_count: u16,
    pub(crate) animation_table_offset: u32,
}

impl Skeleton {
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bones.iter().find(|bone| bone.name == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RotationKey {
    /// Seconds from clip start.
    pub time: f32,
    pub rotation: Quat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranslationKey {
    /// Seconds from clip start.
    pub time: f32,
    pub translation: Vec3,
}

/// Keyframe tracks for one bone of one clip. Either track may be empty.
#[derive(Clone, Debug)]
pub struct BoneTrack {
    pub bone: usize,
    pub rotations: Vec<RotationKey>,
    pub translations: Vec<TranslationKey>,
}

#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub flags: u32,
    /// Clip length in seconds.
    pub duration: f32,
    /// Fixed playback rate; key times themselves are absolute seconds.
    pub sample_rate: f32,
    pub tracks: Vec<BoneTrack>,
}

/// An assembled model: meshes, materials, and for skinned models the
/// skeleton, animation clips, and the name of the companion keyframe
/// library they depend on.
#[derive(Clone, Debug)]
pub struct Model {
    pub materials: Vec<Material>,
    pub meshes: Vec<Mesh>,
    pub skeleton: Option<Skeleton>,
    pub animations: Vec<AnimationClip>,
    /// Base name of the `.tkl` keyframe-library companion, from the
    /// `SkeletonHeader` symbol.
    pub keylib_name: Option<String>,
    /// Static interior geometry (the `Database` path): no skeleton, no
    /// animations.
    pub is_interior: bool,
}

impl Model {
    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|material| material.name == name)
    }

    pub fn animation(&self, name: &str) -> Option<&AnimationClip> {
        self.animations.iter().find(|clip| clip.name == name)
    }
}
