use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_editor::{Editor, EditorConfig, Mode, NodeKey, TextFilter};
use folio_nodes::ElementKind;

fn build_editor(paragraphs: usize) -> Editor {
    let mut editor = Editor::new(EditorConfig::new("bench")).unwrap();
    editor
        .update(|tree| {
            for i in 0..paragraphs {
                let p = tree.create_element(ElementKind::Paragraph);
                let t = tree.create_text(format!("paragraph number {}", i));
                tree.append(&p, &[t])?;
                tree.append(&NodeKey::root(), &[p])?;
            }
            Ok(())
        })
        .unwrap();
    editor
}

fn cached_text_content(c: &mut Criterion) {
    let editor = build_editor(1_000);

    c.bench_function("text_content_cached_1000", |b| {
        b.iter(|| black_box(editor.text_content()))
    });
}

fn recomputed_text_content(c: &mut Criterion) {
    let editor = build_editor(1_000);
    let tree = editor.tree();

    c.bench_function("text_content_bypass_1000", |b| {
        b.iter(|| black_box(tree.text_content(Mode::ReadOnly, TextFilter::new(true, false))))
    });
}

criterion_group!(benches, cached_text_content, recomputed_text_content);
criterion_main!(benches);
