use pixel_picker::error::PickerError;
use pixel_picker::shader::split_stage_sources;

const GOOD: &str = "\
#type vertex
#version 450
void main() {}

#type fragment
#version 450
void main() {}
";

#[test]
fn splits_an_asset_into_two_stage_sources() {
    let stages = split_stage_sources(GOOD).expect("two well-formed stages");
    assert!(stages.vertex.starts_with("#version 450"));
    assert!(stages.fragment.starts_with("#version 450"));
    assert!(!stages.vertex.contains("#type"));
    assert!(!stages.fragment.contains("#type"));
}

#[test]
fn the_shipped_quad_asset_parses() {
    let asset = include_str!("../assets/shaders/quad.glsl");
    let stages = split_stage_sources(asset).expect("shipped asset must split");
    assert!(stages.vertex.contains("u_ViewProjection"));
    assert!(stages.fragment.contains("u_Image"));
}

#[test]
fn pixel_is_accepted_as_a_fragment_synonym() {
    let source = GOOD.replace("#type fragment", "#type pixel");
    let stages = split_stage_sources(&source).expect("pixel stage accepted");
    assert!(stages.fragment.starts_with("#version"));
}

#[test]
fn stage_type_matching_ignores_case() {
    let source = GOOD
        .replace("#type vertex", "#type VERTEX")
        .replace("#type fragment", "#type Pixel");
    assert!(split_stage_sources(&source).is_ok());
}

#[test]
fn unknown_stage_types_are_rejected() {
    let source = GOOD.replace("#type fragment", "#type geometry");
    match split_stage_sources(&source) {
        Err(PickerError::ShaderBuild(log)) => {
            assert!(log.contains("geometry"), "log should name the bad type: {log}")
        }
        other => panic!("expected a shader build error, got {other:?}"),
    }
}

#[test]
fn stages_must_start_with_a_version_directive() {
    let source = "#type vertex\nvoid main() {}\n";
    assert!(matches!(
        split_stage_sources(source),
        Err(PickerError::ShaderBuild(_))
    ));
}

#[test]
fn a_lone_stage_is_not_a_program() {
    let source = "#type vertex\n#version 450\nvoid main() {}\n";
    assert!(matches!(
        split_stage_sources(source),
        Err(PickerError::ShaderBuild(_))
    ));
}

#[test]
fn duplicate_stages_are_rejected() {
    let source = GOOD.replace("#type fragment", "#type vertex");
    match split_stage_sources(&source) {
        Err(PickerError::ShaderBuild(log)) => {
            assert!(log.contains("duplicate"), "log should mention the duplicate: {log}")
        }
        other => panic!("expected a shader build error, got {other:?}"),
    }
}
