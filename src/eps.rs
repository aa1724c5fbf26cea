//! PostScript (EPS) rendering of a relation, for eyeballing small
//! adjacencies. Elements sit in a vertical column on the left, nodes in
//! a horizontal row along the bottom, one line per incidence. Debug
//! output only; nothing depends on the exact layout.

use crate::one_to_many::OneToMany;

const MARGIN: f64 = 50.0;
const ELEMENT_SPACING: f64 = 30.0;
const NODE_SPACING: f64 = 30.0;
const DOT_RADIUS: f64 = 3.0;

/// Render the relation as a self-contained EPS document.
pub fn to_eps_string(relation: &OneToMany) -> String {
    let elements = relation.count();
    let nodes = relation.node_space();

    let width = MARGIN * 2.0 + NODE_SPACING * nodes.max(1) as f64;
    let height = MARGIN * 2.0 + ELEMENT_SPACING * elements.max(1) as f64;

    let element_pos = |e: usize| -> (f64, f64) {
        (MARGIN, MARGIN + ELEMENT_SPACING * (e as f64 + 1.0))
    };
    let node_pos = |n: usize| -> (f64, f64) {
        (MARGIN + NODE_SPACING * (n as f64 + 1.0), MARGIN)
    };

    let mut out = String::new();
    out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    out.push_str(&format!(
        "%%BoundingBox: 0 0 {} {}\n",
        width.ceil() as i64,
        height.ceil() as i64
    ));
    out.push_str("%%EndComments\n");
    out.push_str("0.5 setlinewidth\n");

    // incidence lines first, dots and labels on top
    for (e, row) in relation.rows().iter().enumerate() {
        let (ex, ey) = element_pos(e);
        for &n in row {
            let (nx, ny) = node_pos(n);
            out.push_str(&format!(
                "newpath {ex:.1} {ey:.1} moveto {nx:.1} {ny:.1} lineto stroke\n"
            ));
        }
    }

    for e in 0..elements {
        let (x, y) = element_pos(e);
        out.push_str(&format!(
            "newpath {x:.1} {y:.1} {DOT_RADIUS} 0 360 arc fill\n"
        ));
        out.push_str(&format!(
            "{:.1} {y:.1} moveto /Helvetica findfont 8 scalefont setfont (e{e}) show\n",
            x - 20.0
        ));
    }
    for n in 0..nodes {
        let (x, y) = node_pos(n);
        out.push_str(&format!(
            "newpath {x:.1} {y:.1} {DOT_RADIUS} 0 360 arc fill\n"
        ));
        out.push_str(&format!(
            "{x:.1} {:.1} moveto /Helvetica findfont 8 scalefont setfont (n{n}) show\n",
            y - 15.0
        ));
    }

    out.push_str("showpage\n");
    out.push_str("%%EOF\n");
    out
}
