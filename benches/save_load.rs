//! This bench saves and reloads a project with many operations, requests and
//! endpoints.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use soapsender::{Directory, Name, Operation, Project, Request};
use tempfile::TempDir;

fn name(s: &str) -> Name {
    Name::try_from(s).unwrap()
}

/// Builds a project with 100 operations of 5 requests each.
fn large_project() -> Project {
    let mut project = Project::new(name("Bench"), "http://localhost:8080/ws?wsdl".to_string())
        .with_service_name("BenchService".to_string());
    for i in 0..100 {
        let mut operation = Operation::new(name(&format!("Operation{i:03}")));
        for j in 0..5 {
            let mut request = Request::new(
                name(&format!("Request {j}")),
                format!("<soapenv:Envelope><op{i}>{j}</op{i}></soapenv:Envelope>\n"),
            );
            request.add_endpoint("http://localhost:8080/ws");
            request.add_endpoint("http://staging:8080/ws");
            operation.insert_request(request);
        }
        project.insert_operation(operation);
    }
    project
}

fn save(c: &mut Criterion) {
    let project = large_project();
    c.bench_function("save project", |b| {
        b.iter_batched(
            || TempDir::new().unwrap(),
            |tmp_dir| {
                Directory::open(tmp_dir.path().to_path_buf())
                    .unwrap()
                    .save(&project)
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

fn load(c: &mut Criterion) {
    let project = large_project();
    let tmp_dir = TempDir::new().unwrap();
    let directory = Directory::open(tmp_dir.path().to_path_buf()).unwrap();
    directory.save(&project).unwrap();

    c.bench_function("load project", |b| {
        b.iter(|| directory.load(project.name()).unwrap());
    });
}

criterion_group!(benches, save, load);
criterion_main!(benches);
