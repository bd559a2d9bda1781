//! Benchmarks for Synchro Data export.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};

use synchro_data::{
    ExportRequest,
    scene::BakedScene,
    schema::{
        CameraLens, IDENTITY_ROWS, ObjectDescription, ObjectKindDescription, RenderSettings,
        SceneDescription, TransformKey,
    },
    synchro::{FrameRecord, SynchroExporter},
};

fn bench_frame_record(c: &mut Criterion) {
    let world = Mat4::from_scale_rotation_translation(
        Vec3::ONE,
        Quat::from_rotation_y(0.4),
        Vec3::new(1.0, 2.0, 3.0),
    );
    let lens = CameraLens::default();
    let mut buf = Vec::with_capacity(256);

    c.bench_function("camera_record", |b| {
        b.iter(|| {
            buf.clear();
            let record = FrameRecord::camera(black_box(world), &lens, 0.5);
            record.write_to(&mut buf).unwrap();
        });
    });
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");

    for objects in [1, 10, 100] {
        let description = SceneDescription {
            render: RenderSettings::default(),
            objects: (0..objects)
                .map(|i| ObjectDescription {
                    name: format!("Object.{:03}", i),
                    selected: true,
                    kind: if i == 0 {
                        ObjectKindDescription::Camera {
                            lens: Some(CameraLens::default()),
                        }
                    } else {
                        ObjectKindDescription::Generic
                    },
                    keys: vec![TransformKey {
                        frame: 1,
                        matrix: IDENTITY_ROWS,
                    }],
                })
                .collect(),
        };
        let request = ExportRequest::with_range(1, 250);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} objects", objects)),
            &objects,
            |b, _| {
                b.iter(|| {
                    let mut scene = BakedScene::new(description.clone());
                    let mut buf = Vec::new();
                    SynchroExporter::new(&mut buf)
                        .export(&mut scene, black_box(&request))
                        .unwrap();
                    buf
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_frame_record, bench_export);
criterion_main!(benches);
