use approx::assert_relative_eq;
use planbim_algo::openings::{nearest_wall, OpeningBinder};
use planbim_algo::walls::WallReconstructor;
use planbim_core::building::{OpeningKind, Wall};
use planbim_core::config::{OpeningConfig, WallConfig};
use planbim_core::geom::Vec2;
use planbim_core::material::MaterialConfig;
use planbim_core::model::{
    BlockDefinition, BlockInstance, CirclePrim, Document, LinePrim, Primitive, RawSegment, Units,
};
use planbim_core::units::{UnitConfig, UnitResolver};

fn line(a: (f64, f64), b: (f64, f64)) -> Primitive {
    Primitive::Line(LinePrim {
        start: Vec2::new(a.0, a.1),
        end: Vec2::new(b.0, b.1),
        layer: "0".to_string(),
    })
}

fn instance(name: &str, layer: &str, at: (f64, f64), rotation: f64, scale: f64) -> BlockInstance {
    BlockInstance {
        name: name.to_string(),
        position: Vec2::new(at.0, at.1),
        rotation,
        scale: Vec2::new(scale, scale),
        layer: layer.to_string(),
    }
}

fn definition(name: &str, base: (f64, f64), primitives: Vec<Primitive>) -> Primitive {
    Primitive::BlockDefinition(BlockDefinition {
        name: name.to_string(),
        base_point: Vec2::new(base.0, base.1),
        primitives,
    })
}

fn walls_along_x() -> Vec<Wall> {
    let units = UnitConfig::default();
    WallReconstructor::new(
        &WallConfig::default(),
        &MaterialConfig::default(),
        UnitResolver::new(&units, Units::Unknown),
    )
    .reconstruct(&[
        RawSegment::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), "СТЕНА", 0),
        RawSegment::new(Vec2::new(0.0, 100.0), Vec2::new(10.0, 100.0), "СТЕНА", 1),
    ])
}

#[test]
fn classification_prefers_layer_over_block_name() {
    let cfg = OpeningConfig::default();
    let units = UnitConfig::default();
    let doc = Document::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);

    let window_layer = instance("ДВ-1", "АР_ОКНА", (0.0, 0.0), 0.0, 1.0);
    assert_eq!(Some(OpeningKind::Window), binder.classify(&window_layer));
    let door_layer = instance("WIN-2", "ДВЕРЬ_Проём", (0.0, 0.0), 0.0, 1.0);
    assert_eq!(Some(OpeningKind::Door), binder.classify(&door_layer));
    let window_name = instance("Окно_1200", "0", (0.0, 0.0), 0.0, 1.0);
    assert_eq!(Some(OpeningKind::Window), binder.classify(&window_name));
    let door_name = instance("Door_900", "0", (0.0, 0.0), 0.0, 1.0);
    assert_eq!(Some(OpeningKind::Door), binder.classify(&door_name));
    let furniture = instance("TABLE", "Мебель", (0.0, 0.0), 0.0, 1.0);
    assert_eq!(None, binder.classify(&furniture));
}

#[test]
fn center_comes_from_transformed_block_geometry() {
    let doc = Document::new(
        Units::Unknown,
        vec![definition("door_900", (0.0, 0.0), vec![line((0.0, 0.0), (2.0, 0.0))])],
    );
    let cfg = OpeningConfig::default();
    let units = UnitConfig::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);

    let rotated = instance("DOOR_900", "ДВЕРЬ", (5.0, 5.0), 90.0, 1.0);
    let c = binder.resolve_center(&rotated);
    assert_relative_eq!(5.0, c.x, epsilon = 1e-9);
    assert_relative_eq!(6.0, c.y, epsilon = 1e-9);

    let scaled = instance("door_900", "ДВЕРЬ", (5.0, 5.0), 0.0, 3.0);
    let c = binder.resolve_center(&scaled);
    assert_relative_eq!(8.0, c.x, epsilon = 1e-9);
    assert_relative_eq!(5.0, c.y, epsilon = 1e-9);
}

#[test]
fn nested_blocks_contribute_to_the_center() {
    let doc = Document::new(
        Units::Unknown,
        vec![
            definition("FRAME", (0.0, 0.0), vec![line((0.0, 0.0), (1.0, 0.0))]),
            definition(
                "WIN_OUTER",
                (0.0, 0.0),
                vec![
                    Primitive::BlockInstance(instance("FRAME", "0", (2.0, 0.0), 0.0, 1.0)),
                    Primitive::Circle(CirclePrim {
                        center: Vec2::new(0.0, 0.0),
                        radius: 0.5,
                        layer: "0".to_string(),
                    }),
                ],
            ),
        ],
    );
    let cfg = OpeningConfig::default();
    let units = UnitConfig::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);

    // Circle spans x in [-0.5, 0.5], nested line x in [2, 3].
    let c = binder.resolve_center(&instance("WIN_OUTER", "ОКНА", (100.0, 50.0), 0.0, 1.0));
    assert_relative_eq!(101.25, c.x, epsilon = 1e-9);
    assert_relative_eq!(50.0, c.y, epsilon = 1e-9);
}

#[test]
fn self_referencing_block_terminates() {
    let doc = Document::new(
        Units::Unknown,
        vec![definition(
            "LOOP",
            (0.0, 0.0),
            vec![
                line((0.0, 0.0), (4.0, 0.0)),
                Primitive::BlockInstance(instance("LOOP", "0", (10.0, 0.0), 0.0, 1.0)),
            ],
        )],
    );
    let cfg = OpeningConfig::default();
    let units = UnitConfig::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);
    let c = binder.resolve_center(&instance("LOOP", "ДВЕРЬ", (0.0, 0.0), 0.0, 1.0));
    assert_relative_eq!(2.0, c.x, epsilon = 1e-9);
}

#[test]
fn unknown_or_empty_block_falls_back_to_insertion_point() {
    let doc = Document::new(Units::Unknown, vec![definition("EMPTY", (0.0, 0.0), Vec::new())]);
    let cfg = OpeningConfig::default();
    let units = UnitConfig::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);

    let empty = instance("EMPTY", "ДВЕРЬ", (3.0, 4.0), 30.0, 1.0);
    assert_eq!(Vec2::new(3.0, 4.0), binder.resolve_center(&empty));
    let missing = instance("NOPE", "ДВЕРЬ", (7.0, 8.0), 0.0, 1.0);
    assert_eq!(Vec2::new(7.0, 8.0), binder.resolve_center(&missing));
}

#[test]
fn binds_to_nearest_wall_and_drops_out_of_range() {
    let walls = walls_along_x();
    let cfg = OpeningConfig {
        tolerance: 10.0,
        ..OpeningConfig::default()
    };
    let units = UnitConfig::default();
    let doc = Document::default();
    let binder = OpeningBinder::new(&cfg, UnitResolver::new(&units, Units::Unknown), &doc);

    let instances = vec![
        instance("D", "ДВЕРЬ", (5.0, 0.0), 0.0, 900.0),
        instance("W", "ОКНА", (5.0, 96.0), 0.0, 0.05),
        instance("D", "ДВЕРЬ", (5.0, 50.0), 0.0, 1.0),
        instance("CHAIR", "Мебель", (5.0, 0.0), 0.0, 1.0),
    ];
    let out = binder.bind(&instances, &walls);
    assert_eq!(2, out.openings.len());
    assert_eq!(1, out.unbound);

    let door = &out.openings[0];
    assert_eq!("opening-1", door.id);
    assert_eq!(OpeningKind::Door, door.kind);
    assert_eq!(walls[0].id, door.host_wall_id);
    assert_eq!(0.0, door.host_distance);
    assert_relative_eq!(0.9, door.width);

    let window = &out.openings[1];
    assert_eq!("opening-2", window.id);
    assert_eq!(walls[1].id, window.host_wall_id);
    assert_relative_eq!(4.0, window.host_distance);
    assert_relative_eq!(1.2, window.width);
}

#[test]
fn tolerance_is_exclusive_and_ties_keep_the_first_wall() {
    let walls = walls_along_x();
    let p = Vec2::new(5.0, 50.0);
    assert!(nearest_wall(p, &walls, 50.0).is_none());
    let (wall, d) = nearest_wall(p, &walls, 50.1).expect("both walls in range");
    assert_eq!(walls[0].id, wall.id);
    assert_relative_eq!(50.0, d);
}
