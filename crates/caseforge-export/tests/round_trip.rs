//! Exported case meshes read back as the same triangles.

use caseforge_core::{catalog, CaseParams, CutoutMode};
use caseforge_export::{
    export_stl, export_stl_ascii, parse_ascii_stl, parse_binary_stl, serialize_mesh, SOLID_NAME,
};
use caseforge_geometry::{
    face_normal, generate_case_solid, generate_case_solid_with, CaseSolid, DecorativeShape,
};

fn sixteen_pro() -> CaseSolid {
    let spec = catalog().get("iphone-16-pro").unwrap();
    let params = CaseParams::default().with_cutout_mode(CutoutMode::Overlay);
    generate_case_solid_with(spec, &params).unwrap()
}

#[test]
fn ascii_export_reads_back() {
    let solid = sixteen_pro();
    let mesh = solid.mesh();
    let doc = parse_ascii_stl(&export_stl_ascii(&solid).unwrap()).unwrap();

    assert_eq!(doc.name, SOLID_NAME);
    assert_eq!(doc.facets.len(), mesh.triangle_count());

    for (facet, [a, b, c]) in doc.facets.iter().zip(mesh.triangles()) {
        // Shortest round-trip float formatting keeps coordinates exact.
        assert_eq!(facet.vertices, [a, b, c]);
        let expected = face_normal(a, b, c);
        assert!((facet.normal - expected).length() < 1e-12);
    }
}

#[test]
fn declared_normals_follow_winding() {
    let solid = sixteen_pro();
    let doc = parse_ascii_stl(&export_stl_ascii(&solid).unwrap()).unwrap();
    for facet in &doc.facets {
        let [a, b, c] = facet.vertices;
        let winding = (b - a).cross(c - a);
        if winding.length() > 1e-12 {
            assert!(facet.normal.dot(winding) > 0.0);
        }
    }
}

#[test]
fn binary_export_reads_back() {
    let solid = sixteen_pro();
    let doc = parse_binary_stl(&export_stl(&solid).unwrap()).unwrap();
    assert_eq!(doc.facets.len(), solid.mesh().triangle_count());

    for (facet, [a, _, _]) in doc.facets.iter().zip(solid.mesh().triangles()) {
        assert!((facet.vertices[0] - a).length() < 1e-4);
    }
}

#[test]
fn subtracted_case_reads_back() {
    let solid = generate_case_solid(catalog().get("iphone-14-pro").unwrap()).unwrap();
    let mesh = solid.mesh();

    let doc = parse_ascii_stl(&export_stl_ascii(&solid).unwrap()).unwrap();
    assert_eq!(doc.facets.len(), mesh.triangle_count());
    for (facet, [a, b, c]) in doc.facets.iter().zip(mesh.triangles()) {
        assert_eq!(facet.vertices, [a, b, c]);
    }

    let binary = parse_binary_stl(&export_stl(&solid).unwrap()).unwrap();
    assert_eq!(binary.facets.len(), mesh.triangle_count());
}

#[test]
fn parts_export_without_transformation() {
    let mesh = DecorativeShape::Heart.build().unwrap();
    let text = serialize_mesh(&mesh.positions, Some(&mesh.indices), "heart").unwrap();
    let doc = parse_ascii_stl(&text).unwrap();
    assert_eq!(doc.name, "heart");
    assert_eq!(doc.facets.len(), mesh.triangle_count());
    assert_eq!(doc.facets[0].vertices[0], mesh.positions[mesh.indices[0] as usize]);
}
