//! Minimal SVG element tree.

use std::f64::consts::PI;
use std::fmt;

/// An SVG element with attributes and children.
///
/// `Display` writes compact markup: one element per line, empty elements
/// self-closed, no XML declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in &self.children {
            write!(f, "\n{child}")?;
        }
        write!(f, "\n</{}>", self.name)
    }
}

pub fn document(width: f64, height: f64, body: Vec<Element>) -> Element {
    Element::new("svg")
        .attr("width", format!("{width}mm"))
        .attr("height", format!("{height}mm"))
        .attr("viewBox", format!("0 0 {width} {height}"))
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .children(body)
}

pub fn circle(cx: f64, cy: f64, r: f64) -> Element {
    Element::new("circle")
        .attr("cx", format!("{cx:.4}"))
        .attr("cy", format!("{cy:.4}"))
        .attr("r", format!("{r:.3}"))
}

pub fn diamond(cx: f64, cy: f64, r: f64) -> Element {
    polygon(&[(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy)])
}

/// Pointy-top hexagon with circumradius `r`.
pub fn hex(cx: f64, cy: f64, r: f64) -> Element {
    let corners: Vec<_> = (1..=6)
        .map(|i| {
            let angle = i as f64 * PI / 3.0 - PI / 6.0;
            (cx + r * angle.cos(), cy + r * angle.sin())
        })
        .collect();
    polygon(&corners)
}

fn polygon(points: &[(f64, f64)]) -> Element {
    let points = points
        .iter()
        .map(|(x, y)| format!("{x:.4},{y:.4}"))
        .collect::<Vec<_>>()
        .join(" ");
    Element::new("polygon").attr("points", points)
}

fn backdrop(fill: &str) -> Element {
    Element::new("rect")
        .attr("width", "100%")
        .attr("height", "100%")
        .attr("fill", fill)
}

/// Outlines only, for cutting.
pub fn cut_paths(dots: Vec<Element>) -> Vec<Element> {
    vec![Element::new("g")
        .attr("stroke-width", "0.002mm")
        .attr("stroke", "black")
        .attr("fill", "none")
        .children(dots)]
}

pub fn white_on_black(dots: Vec<Element>) -> Vec<Element> {
    vec![
        backdrop("black"),
        Element::new("g").attr("fill", "white").children(dots),
    ]
}

pub fn black_on_white(dots: Vec<Element>) -> Vec<Element> {
    vec![
        backdrop("white"),
        Element::new("g").attr("fill", "black").children(dots),
    ]
}
