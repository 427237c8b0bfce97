use anyhow::{anyhow, Result};
use log::{debug, info, trace};
use psp_lib_parser::parse_psp_lib;
use rcpsp::Instance;
use std::{borrow::Cow, fs, path::PathBuf};

pub fn graph(input_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let contents = fs::read_to_string(input_path)?;
    trace!("input file contents: {contents}");

    let psp = parse_psp_lib(contents.as_str())?;
    let instance = Instance::try_from(&psp)?;

    debug!(
        "Creating graph for file with basedata: {}",
        psp.file_with_basedata
    );

    let edges = Edges::new(&psp.file_with_basedata, &instance)?;

    let mut output_file = fs::File::create(output_path.clone())?;
    dot::render(&edges, &mut output_file)?;

    info!("Wrote graphviz dot file to: {:?}", output_path);

    Ok(())
}

type Nd = usize;
type Ed = (usize, usize);

/// Direct precedences of an instance, nodes labelled with their durations.
struct Edges {
    name: String,
    durations: Vec<usize>,
    edges: Vec<Ed>,
}

impl Edges {
    fn new(basedata: &str, instance: &Instance) -> Result<Self> {
        let mut name: String = basedata
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            name.insert(0, 'G');
        }
        dot::Id::new(name.clone()).map_err(|_| anyhow!("invalid graph id {name}"))?;

        let mut durations = Vec::with_capacity(instance.nb_activities());
        let mut edges = vec![];
        for activity in 0..instance.nb_activities() {
            durations.push(instance.duration(activity)?);
            for successor in instance.successors(activity)? {
                edges.push((activity, successor));
            }
        }

        Ok(Self {
            name,
            durations,
            edges,
        })
    }
}

impl<'a> dot::Labeller<'a, Nd, Ed> for Edges {
    fn graph_id(&'a self) -> dot::Id<'a> {
        dot::Id::new(self.name.clone()).expect("graph id is checked in Edges::new")
    }

    fn node_id(&'a self, n: &Nd) -> dot::Id<'a> {
        let id = format!("N{}", *n);
        dot::Id::new(id).expect("Failed to label graph node")
    }

    fn node_label(&'a self, n: &Nd) -> dot::LabelText<'a> {
        let duration = self.durations.get(*n).copied().unwrap_or_default();
        dot::LabelText::label(format!("{} ({})", *n, duration))
    }
}

impl<'a> dot::GraphWalk<'a, Nd, Ed> for Edges {
    fn nodes(&self) -> dot::Nodes<'a, Nd> {
        Cow::Owned((0..self.durations.len()).collect())
    }

    fn edges(&'a self) -> dot::Edges<'a, Ed> {
        Cow::Borrowed(&self.edges[..])
    }

    fn source(&self, e: &Ed) -> Nd {
        e.0
    }

    fn target(&self, e: &Ed) -> Nd {
        e.1
    }
}
