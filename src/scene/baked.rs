//! In-memory scene built from a [`SceneDescription`].

use std::fs;
use std::io;
use std::path::Path;

use glam::Mat4;

use super::{ExportObject, ObjectId, ObjectKind, SceneProvider};
use crate::schema::{CameraLens, ObjectKindDescription, RenderSettings, SceneDescription};

/// Convert a row-major `[row][column]` matrix into a glam matrix.
pub fn mat4_from_rows(rows: &[[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(rows).transpose()
}

struct BakedObject {
    name: String,
    selected: bool,
    kind: ObjectKind,
    lens: Option<CameraLens>,
    /// Sorted by frame.
    keys: Vec<(i32, Mat4)>,
}

impl BakedObject {
    /// Latest key at or before `frame`; the first key holds before it.
    fn matrix_at(&self, frame: i32) -> Mat4 {
        let idx = self.keys.partition_point(|(f, _)| *f <= frame);
        match idx {
            0 => self.keys.first().map_or(Mat4::IDENTITY, |(_, m)| *m),
            i => self.keys[i - 1].1,
        }
    }
}

/// Scene with pre-baked transform keys, stepping frames without a host.
pub struct BakedScene {
    render: RenderSettings,
    objects: Vec<BakedObject>,
    frame: i32,
}

impl BakedScene {
    /// Build a scene from its description. The current frame starts at the
    /// scene's `frame_start`.
    pub fn new(description: SceneDescription) -> Self {
        let objects = description
            .objects
            .into_iter()
            .map(|object| {
                let (kind, lens) = match object.kind {
                    ObjectKindDescription::Generic => (ObjectKind::Generic, None),
                    ObjectKindDescription::Camera { lens } => (ObjectKind::Camera, lens),
                };
                let mut keys: Vec<(i32, Mat4)> = object
                    .keys
                    .iter()
                    .map(|key| (key.frame, mat4_from_rows(&key.matrix)))
                    .collect();
                keys.sort_by_key(|(frame, _)| *frame);

                BakedObject {
                    name: object.name,
                    selected: object.selected,
                    kind,
                    lens,
                    keys,
                }
            })
            .collect();

        Self {
            frame: description.render.frame_start,
            render: description.render,
            objects,
        }
    }

    /// Load a scene description from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let description: SceneDescription = serde_json::from_str(&text)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Self::new(description))
    }

    /// Number of objects in the scene, selected or not.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SceneProvider for BakedScene {
    fn render_settings(&self) -> RenderSettings {
        self.render.clone()
    }

    fn objects(&self, only_selected: bool) -> Vec<ExportObject> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.selected || !only_selected)
            .map(|(i, object)| ExportObject {
                id: ObjectId(i),
                name: object.name.clone(),
                kind: object.kind,
            })
            .collect()
    }

    fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    fn current_frame(&self) -> i32 {
        self.frame
    }

    fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        self.objects.get(id.0).map(|object| object.matrix_at(self.frame))
    }

    fn camera_lens(&self, id: ObjectId) -> Option<CameraLens> {
        self.objects.get(id.0).and_then(|object| object.lens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IDENTITY_ROWS, ObjectDescription, TransformKey};
    use glam::Vec3;

    fn translated(x: f32, y: f32, z: f32) -> [[f32; 4]; 4] {
        let mut rows = IDENTITY_ROWS;
        rows[0][3] = x;
        rows[1][3] = y;
        rows[2][3] = z;
        rows
    }

    fn object(name: &str, selected: bool, keys: Vec<TransformKey>) -> ObjectDescription {
        ObjectDescription {
            name: name.to_string(),
            selected,
            kind: ObjectKindDescription::Generic,
            keys,
        }
    }

    #[test]
    fn test_row_major_conversion() {
        let m = mat4_from_rows(&translated(1.0, 2.0, 3.0));
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.row(3).to_array(), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_selection_filter_keeps_order() {
        let scene = BakedScene::new(SceneDescription {
            render: RenderSettings::default(),
            objects: vec![
                object("A", true, vec![]),
                object("B", false, vec![]),
                object("C", true, vec![]),
            ],
        });

        let selected: Vec<_> = scene.objects(true).into_iter().map(|o| o.name).collect();
        assert_eq!(selected, ["A", "C"]);

        let all: Vec<_> = scene.objects(false).into_iter().map(|o| o.name).collect();
        assert_eq!(all, ["A", "B", "C"]);
        assert_eq!(scene.objects(true)[1].id, ObjectId(2));
    }

    #[test]
    fn test_keys_hold_between_frames() {
        let mut scene = BakedScene::new(SceneDescription {
            render: RenderSettings::default(),
            objects: vec![object(
                "Mover",
                true,
                vec![
                    TransformKey {
                        frame: 10,
                        matrix: translated(10.0, 0.0, 0.0),
                    },
                    TransformKey {
                        frame: 5,
                        matrix: translated(5.0, 0.0, 0.0),
                    },
                ],
            )],
        });
        let id = ObjectId(0);
        let x_at = |scene: &mut BakedScene, frame| {
            scene.set_frame(frame);
            scene.world_matrix(id).unwrap().w_axis.x
        };

        assert_eq!(x_at(&mut scene, 1), 5.0);
        assert_eq!(x_at(&mut scene, 5), 5.0);
        assert_eq!(x_at(&mut scene, 9), 5.0);
        assert_eq!(x_at(&mut scene, 10), 10.0);
        assert_eq!(x_at(&mut scene, 200), 10.0);
        assert_eq!(scene.current_frame(), 200);
    }

    #[test]
    fn test_no_keys_is_identity() {
        let scene = BakedScene::new(SceneDescription {
            render: RenderSettings::default(),
            objects: vec![object("Still", true, vec![])],
        });
        assert_eq!(scene.world_matrix(ObjectId(0)), Some(Mat4::IDENTITY));
        assert_eq!(scene.world_matrix(ObjectId(1)), None);
    }

    #[test]
    fn test_camera_lens_lookup() {
        let scene = BakedScene::new(SceneDescription::example());
        assert_eq!(scene.camera_lens(ObjectId(0)), Some(CameraLens::default()));
        assert_eq!(scene.camera_lens(ObjectId(1)), None);
        assert_eq!(scene.current_frame(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let json = serde_json::to_string(&SceneDescription::example()).unwrap();
        fs::write(&path, json).unwrap();

        let scene = BakedScene::load(&path).unwrap();
        assert_eq!(scene.len(), 2);

        fs::write(&path, "{ not json").unwrap();
        let err = BakedScene::load(&path).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
