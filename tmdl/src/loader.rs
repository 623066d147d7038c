use log::{debug, warn};

use crate::Error;
use crate::animation::decode_clips;
use crate::container::{Container, SymbolTable};
use crate::cursor::ByteCursor;
use crate::geometry::{decode_skinned_vertices, decode_static_vertices, decode_triangle_strip};
use crate::keylib::KeyframeLibrary;
use crate::model::{Material, Mesh, Model};
use crate::skeleton::decode_skeleton;

/// Bytes per material record.
const MATERIAL_STRIDE: usize = 0x128;

/// Offset of the texture name inside a material record.
const MATERIAL_TEXTURE_OFFSET: usize = 0x68;

/// Skinned meshes are published as `LOD0_Mesh_0` .. `LOD0_Mesh_31`; the walk
/// stops at the first missing name.
const MAX_LOD_MESHES: usize = 32;

const FILE_HEADER_SIGNATURE: &[u8; 4] = b"TMDL";

impl Model {
    /// Decodes a `.trb` buffer into a model, without animations.
    ///
    /// `Ok(None)` means the container parsed but does not describe a model
    /// of this kind (required symbols are absent); a negative type match,
    /// not a corrupt file.
    pub fn from_trb_bytes(bytes: &[u8]) -> Result<Option<Model>, Error> {
        let container = Container::parse(bytes)?;
        Model::decode(&container)
    }

    /// Full pipeline: model plus animation clips resolved through `keylib`.
    pub fn from_trb_bytes_with_keylib(
        bytes: &[u8],
        keylib: &KeyframeLibrary,
    ) -> Result<Option<Model>, Error> {
        let container = Container::parse(bytes)?;
        let Some(mut model) = Model::decode(&container)? else {
            return Ok(None);
        };
        model.decode_animations(&container, keylib)?;
        Ok(Some(model))
    }

    /// Assembles meshes, materials, and (for skinned models) the skeleton
    /// from a parsed container. Model shape is decided by symbol presence:
    /// no `FileHeader` symbol means the static interior path via `Database`;
    /// with it, the skinned `LOD0_Mesh_N` path plus skeleton.
    pub fn decode(container: &Container) -> Result<Option<Model>, Error> {
        let mut cur = container.section_cursor();

        let Some(materials_symbol) = container.symbols.find("Materials") else {
            return Ok(None);
        };
        cur.seek(materials_symbol.offset as usize)?;
        let materials = decode_materials(&mut cur)?;

        let Some(file_header) = container.symbols.find("FileHeader") else {
            let Some(database) = container.symbols.find("Database") else {
                return Ok(None);
            };
            cur.seek(database.offset as usize)?;
            let Some(meshes) = decode_interior_meshes(&mut cur)? else {
                return Ok(None);
            };
            debug!(
                "decoded interior model: {} meshes, {} materials",
                meshes.len(),
                materials.len()
            );
            return Ok(Some(Model {
                materials,
                meshes,
                skeleton: None,
                animations: Vec::new(),
                keylib_name: None,
                is_interior: true,
            }));
        };

        cur.seek(file_header.offset as usize)?;
        check_file_header(&mut cur)?;

        let keylib_name = match container.symbols.find("SkeletonHeader") {
            Some(symbol) => {
                cur.seek(symbol.offset as usize)?;
                Some(cur.read_cstr()?)
            }
            None => None,
        };

        let skeleton = match container.symbols.find("Skeleton") {
            Some(symbol) => {
                cur.seek(symbol.offset as usize)?;
                Some(decode_skeleton(&mut cur)?)
            }
            None => None,
        };

        let meshes = decode_lod_meshes(&mut cur, &container.symbols)?;
        debug!(
            "decoded skinned model: {} meshes, {} bones",
            meshes.len(),
            skeleton.as_ref().map_or(0, |s| s.bones.len())
        );

        Ok(Some(Model {
            materials,
            meshes,
            skeleton,
            animations: Vec::new(),
            keylib_name,
            is_interior: false,
        }))
    }

    /// Decodes animation clips into `self.animations`. Requires the
    /// container the model came from and the keyframe library named by
    /// [`Model::keylib_name`]. A no-op for models without a skeleton;
    /// meshes and skeleton stay valid if animation decoding fails.
    pub fn decode_animations(
        &mut self,
        container: &Container,
        keylib: &KeyframeLibrary,
    ) -> Result<(), Error> {
        let Some(skeleton) = self.skeleton.as_ref() else {
            debug!("model has no skeleton; skipping animation decode");
            return Ok(());
        };
        let mut cur = container.section_cursor();
        self.animations = decode_clips(&mut cur, skeleton, keylib)?;
        Ok(())
    }
}

/// Material table: a 16-byte header, then fixed-stride records. Each record
/// opens with the material name; the texture name sits at a fixed
/// sub-offset.
fn decode_materials(cur: &mut ByteCursor<'_>) -> Result<Vec<Material>, Error> {
    let _zero1 = cur.read_u32()?;
    let _zero2 = cur.read_u32()?;
    let count = cur.read_u32()? as usize;
    let _table_size = cur.read_u32()?;
    let base = cur.position();

    let mut materials = Vec::with_capacity(count);
    for i in 0..count {
        let record = base + MATERIAL_STRIDE * i;
        cur.seek(record)?;
        let name = cur.read_cstr()?;
        let texture_name = cur.read_cstr_at(record + MATERIAL_TEXTURE_OFFSET)?;
        materials.push(Material { name, texture_name });
    }
    Ok(materials)
}

/// The 16-byte `FileHeader` block. Shipped files load even when the
/// signature is off, so a mismatch only warns.
fn check_file_header(cur: &mut ByteCursor<'_>) -> Result<(), Error> {
    let signature = cur.read_fourcc()?;
    let _zero1 = cur.read_u32()?;
    let _unknown = cur.read_u32()?;
    let _zero2 = cur.read_u32()?;
    if &signature != FILE_HEADER_SIGNATURE {
        warn!(
            "FileHeader signature {:?} is not TMDL; continuing",
            String::from_utf8_lossy(&signature)
        );
    }
    Ok(())
}

/// Static interior meshes: four nested offset indirections from the
/// `Database` symbol down to a flat list of unskinned mesh headers.
/// `Ok(None)` for an empty database or model table; the file is not a
/// model of this kind.
fn decode_interior_meshes(cur: &mut ByteCursor<'_>) -> Result<Option<Vec<Mesh>>, Error> {
    let count = cur.read_u32()?;
    if count == 0 {
        return Ok(None);
    }
    let offset = cur.read_u32()? as usize;
    cur.seek(offset)?;
    let offset = cur.read_u32()? as usize;
    cur.seek(offset)?;

    let model_count = cur.read_u32()?;
    if model_count == 0 {
        return Ok(None);
    }
    let offset = cur.read_u32()? as usize;
    cur.seek(offset)?;
    let offset = cur.read_u32()? as usize + 0x84;
    cur.seek(offset)?;

    let mesh_count = cur.read_u32()? as usize;
    let offset = cur.read_u32()? as usize;
    cur.seek(offset)?;
    let mut mesh_offsets = Vec::with_capacity(mesh_count);
    for _ in 0..mesh_count {
        mesh_offsets.push(cur.read_u32()? as usize);
    }

    let mut meshes = Vec::with_capacity(mesh_count);
    for offset in mesh_offsets {
        cur.seek(offset)?;
        cur.skip(16)?;
        let offset = cur.read_u32()? as usize;
        cur.seek(offset)?;
        let _zero = cur.read_u32()?;

        let face_count = cur.read_u32()? as usize;
        let vertex_count = cur.read_u32()? as usize;
        let _indice_count = cur.read_u32()?;
        let name_offset = cur.read_u32()? as usize;
        let material_name = cur.read_cstr_at(name_offset)?;
        let vertices_offset = cur.read_u32()? as usize;
        let faces_offset = cur.read_u32()? as usize;

        cur.seek(vertices_offset)?;
        let vertices = decode_static_vertices(cur, vertex_count)?;
        let indices = decode_triangle_strip(cur, faces_offset, face_count)?;

        meshes.push(Mesh {
            material_name,
            positions: vertices.positions,
            normals: vertices.normals,
            uvs: vertices.uvs,
            indices,
            weights: None,
        });
    }
    Ok(Some(meshes))
}

struct LodMeshInfo {
    vertex_count: usize,
    face_count: usize,
    indice_count: usize,
    indice_offset: usize,
    vertex_offset: usize,
    face_offset: usize,
}

/// Skinned `LOD0_Mesh_N` meshes: each symbol yields an array of sub-mesh
/// descriptors sharing one material.
fn decode_lod_meshes(
    cur: &mut ByteCursor<'_>,
    symbols: &SymbolTable,
) -> Result<Vec<Mesh>, Error> {
    let mut meshes = Vec::new();

    for n in 0..MAX_LOD_MESHES {
        let Some(symbol) = symbols.find(&format!("LOD0_Mesh_{n}")) else {
            break;
        };
        cur.seek(symbol.offset as usize)?;

        let info_count = cur.read_u32()? as usize;
        let _face_count = cur.read_u32()?;
        let _vertex_count = cur.read_u32()?;
        let name_offset = cur.read_u32()? as usize;
        let material_name = cur.read_cstr_at(name_offset)?;
        let infos_offset = cur.read_u32()? as usize;
        cur.seek(infos_offset)?;

        let mut infos = Vec::with_capacity(info_count);
        for _ in 0..info_count {
            let _unknown = cur.read_u32()?;
            let vertex_count = cur.read_u32()? as usize;
            let face_count = cur.read_u32()? as usize;
            let indice_count = cur.read_u32()? as usize;
            let indice_offset = cur.read_u32()? as usize;
            let vertex_offset = cur.read_u32()? as usize;
            let face_offset = cur.read_u32()? as usize;
            let _zero = cur.read_u32()?;
            let _hash = cur.read_u32()?;
            cur.skip(16)?;
            infos.push(LodMeshInfo {
                vertex_count,
                face_count,
                indice_count,
                indice_offset,
                vertex_offset,
                face_offset,
            });
        }

        for info in &infos {
            cur.seek(info.indice_offset)?;
            let mut indice_array = Vec::with_capacity(info.indice_count);
            for _ in 0..info.indice_count {
                indice_array.push(cur.read_u32()?);
            }

            // Vertex data for every sub-mesh is read from the FIRST
            // sub-mesh's vertex region, whichever sub-mesh is being decoded.
            cur.seek(infos[0].vertex_offset)?;
            let vertices = decode_skinned_vertices(cur, info.vertex_count, &indice_array)?;
            let indices = decode_triangle_strip(cur, info.face_offset, info.face_count)?;

            meshes.push(Mesh {
                material_name: material_name.clone(),
                positions: vertices.positions,
                normals: vertices.normals,
                uvs: vertices.uvs,
                indices,
                weights: Some(vertices.weights),
            });
        }
    }

    Ok(meshes)
}
