//! This bench assembles a large, deep hierarchy of documents, where every
//! chapter references sections in the other manuals.

#![allow(missing_docs)]

use std::fs;

use bindery::{
    domain::{PendingXref, Section, Toctree},
    Builder, Config, Diagnostics, Directory, Docname, Document, DocumentStore, MemoryStore, Node,
    OutputUnit,
};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;

const MANUALS: usize = 4;
const CHAPTERS: usize = 20;
const SECTIONS: usize = 10;

fn docname(s: &str) -> Docname {
    Docname::try_from(s).unwrap()
}

/// Generates `MANUALS` manuals of `CHAPTERS` chapters of `SECTIONS` leaf
/// documents each.
fn project() -> (MemoryStore, Config) {
    let mut store = MemoryStore::new();
    let mut units = Vec::new();

    for m in 0..MANUALS {
        let chapters: Vec<_> = (0..CHAPTERS)
            .map(|c| docname(&format!("m{m}/c{c}/index")))
            .collect();
        store.insert(
            docname(&format!("m{m}/index")),
            Document::new(vec![Node::Toctree(Toctree::new(chapters))]),
        );

        for c in 0..CHAPTERS {
            let leaves: Vec<_> = (0..SECTIONS)
                .map(|s| docname(&format!("m{m}/c{c}/s{s}")))
                .collect();
            store.insert(
                docname(&format!("m{m}/c{c}/index")),
                Document::new(vec![Node::Section(Section::new(
                    format!("Chapter {c}"),
                    vec![Node::Toctree(Toctree::new(leaves))],
                ))]),
            );

            for s in 0..SECTIONS {
                let other = (m + 1) % MANUALS;
                let xref = Node::PendingXref(PendingXref {
                    refdocname: docname(&format!("m{other}/c{c}/s{s}")),
                    refsectname: format!("Section {s}"),
                    reftarget: String::new(),
                });
                store.insert(
                    docname(&format!("m{m}/c{c}/s{s}")),
                    Document::new(vec![Node::Section(Section::new(
                        format!("Section {s}"),
                        vec![Node::paragraph(vec![Node::text("See "), xref])],
                    ))]),
                );
            }
        }

        units.push(OutputUnit {
            docname: docname(&format!("m{m}/index")),
            target: format!("m{m}.json"),
            title: format!("Manual {m}"),
            author: String::new(),
            docclass: "manual".to_string(),
            toctree_only: false,
        });
    }

    let mut config = Config::default();
    config.set_output_units(units);
    (store, config)
}

fn build_all(c: &mut Criterion) {
    let (store, config) = project();

    c.bench_function("build all units", |b| {
        b.iter(|| Builder::new(&store, &config).build_all(&mut Diagnostics::new()));
    });
}

fn load_directory(c: &mut Criterion) {
    let (store, _) = project();
    let tmp_dir = TempDir::new().unwrap();
    for name in store.docnames() {
        let path = tmp_dir.path().join(format!("{name}.yaml"));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let document = store.fetch(name).unwrap();
        fs::write(path, serde_yaml::to_string(&document).unwrap()).unwrap();
    }

    c.bench_function("load directory", |b| {
        b.iter_batched(
            || Directory::new(tmp_dir.path().to_path_buf()),
            |directory| directory.load_all().unwrap(),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, build_all, load_directory);
criterion_main!(benches);
