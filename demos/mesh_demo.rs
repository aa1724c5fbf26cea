//! End-to-end tour: a triangle mesh as a typed matrix, neighborhood
//! queries, and a cascading delete.
//!
//! Run with `cargo run --example mesh_demo`.

use relmat::{eps, Config, ManyToMany, OneToMany, TypedMatrix};

const FACES: usize = 0;
const VERTICES: usize = 1;

fn main() -> Result<(), relmat::RelationError> {
    let config = Config::default();
    relmat::config::init_thread_pool(&config);

    // Two triangles sharing an edge:
    //   face 0 = vertices (0, 1, 2), face 1 = vertices (1, 3, 2)
    let faces = OneToMany::from_rows(vec![vec![0, 1, 2], vec![1, 3, 2]]);
    println!("face -> vertex adjacency:\n{faces}");

    let m2m = ManyToMany::from(faces.clone());
    println!("faces touching vertex 1: {:?}", m2m.elements_from_node(1));
    println!("faces adjacent to face 0: {:?}", m2m.element_neighbours(0)?);
    println!("vertices adjacent to vertex 2: {:?}", m2m.node_neighbours(2));

    // The same mesh as a typed matrix with canonical self-lists.
    let mut mesh = TypedMatrix::new(2)?;
    mesh[(FACES, FACES)].append_elements(vec![vec![0], vec![1]]);
    mesh[(VERTICES, VERTICES)].append_elements((0..4).map(|v| vec![v]));
    mesh[(FACES, VERTICES)].append_elements(faces.rows().to_vec());

    println!("\n{mesh}");
    println!("type order: {:?}", mesh.type_top_order());

    // Deleting vertex 1 takes both faces with it.
    mesh.mark_to_erase(VERTICES, 1)?;
    println!(
        "marked after cascade: faces {:?}, vertices {:?}",
        mesh.marked(FACES)?,
        mesh.marked(VERTICES)?
    );
    mesh.compress();
    println!(
        "after compress: {} faces, {} vertices remain",
        mesh.element_count(FACES)?,
        mesh.element_count(VERTICES)?
    );

    println!("\nEPS rendering of the original mesh:\n");
    print!("{}", eps::to_eps_string(&faces));
    Ok(())
}
