//! Example: Load a YASF document and print the instantiated tree.
//!
//! Run with: cargo run --example inspect_scene -- scenes/demo.json

use std::env;

use anyhow::Context;
use yasf_core::scene::{MeshMaterial, SceneObject};
use yasf_core::{load_yasf, SceneGroup};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-yasf-json>");
        println!("\nExample:");
        println!("  cargo run --example inspect_scene -- scenes/demo.json");
        return Ok(());
    }

    let path = &args[1];
    println!("Loading YASF file: {}", path);

    let loaded = load_yasf(path).with_context(|| format!("failed to load {}", path))?;

    println!("\n=== Scene: {} ===", loaded.name);
    println!("Textures: {}", loaded.textures.len());
    println!("Materials: {}", loaded.materials.len());
    println!("Nodes: {}", loaded.nodes.len());
    println!("Groups: {}", loaded.scene.group_count());
    println!("Meshes: {}", loaded.scene.mesh_count());
    println!("Lights: {}", loaded.scene.light_count());

    if let Some(camera) = loaded.cameras.initial_camera() {
        let eye = camera.location();
        let target = camera.target();
        println!(
            "Camera: ({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2})",
            eye.x, eye.y, eye.z, target.x, target.y, target.z
        );
    }

    println!("\n--- Tree ---");
    for group in &loaded.scene.children {
        print_group(group, 0);
    }

    let bounds = loaded.scene.world_bounds();
    if !bounds.is_empty() {
        println!("\n--- World Bounds ---");
        println!("  Min: ({:.2}, {:.2}, {:.2})", bounds.min.x, bounds.min.y, bounds.min.z);
        println!("  Max: ({:.2}, {:.2}, {:.2})", bounds.max.x, bounds.max.y, bounds.max.z);
    }

    let diagnostics: Vec<_> = loaded.diagnostics().collect();
    if !diagnostics.is_empty() {
        println!("\n--- Diagnostics ({}) ---", diagnostics.len());
        for diagnostic in diagnostics {
            println!("  {}", diagnostic);
        }
    }

    Ok(())
}

fn print_group(group: &SceneGroup, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let material = if group.material.name.is_empty() {
        "<default>"
    } else {
        group.material.name.as_str()
    };
    println!(
        "{}{} [material: {}, cast: {}, receive: {}]",
        indent, group.node_id, material, group.cast_shadows, group.receive_shadows
    );

    for object in &group.objects {
        match object {
            SceneObject::Mesh(instance) => {
                let shading = match &instance.material {
                    MeshMaterial::Shared(_) => "material",
                    MeshMaterial::VertexColors => "vertex colors",
                    MeshMaterial::Video { .. } => "video",
                };
                println!(
                    "{}  mesh: {} vertices, {} triangles ({})",
                    indent,
                    instance.mesh.vertex_count(),
                    instance.mesh.triangle_count(),
                    shading
                );
            }
            SceneObject::Light(light) => {
                println!(
                    "{}  light: {:?} intensity {:.2} at ({:.2}, {:.2}, {:.2})",
                    indent,
                    light.kind,
                    light.intensity,
                    light.position.x,
                    light.position.y,
                    light.position.z
                );
            }
        }
    }

    for child in &group.children {
        print_group(child, depth + 1);
    }
}
