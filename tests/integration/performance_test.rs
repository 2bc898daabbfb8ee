//! Performance tests on generated repositories
//!
//! Deep chains exercise the iterative traversals; layered repositories
//! exercise the parallel whole-repository impact pass.

use std::time::Instant;

use depscope::{
    core::impact_of_all, find_cycles, impact_of, models::config::ResolverConfig, build_graph,
    ImpactIndex,
};

use crate::fixtures::generate_large_repository::{
    generate_chain_repository, generate_layered_repository, layered_path,
};

#[test]
fn test_deep_chain_does_not_overflow() {
    let len = 20_000;
    let repo = generate_chain_repository(len, true);

    let start = Instant::now();
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert_eq!(graph.edges.len(), len);

    let cycles = find_cycles(&graph).unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].len(), len);
    assert_eq!(cycles[0][0], "f0.py");

    let impact = impact_of(&graph, "f0.py").unwrap();
    assert_eq!(impact.len(), len - 1);
    assert_eq!(impact.get(&format!("f{}.py", len - 1)), Some(&1));
    assert_eq!(impact.get("f1.py"), Some(&(len - 1)));

    println!("chain of {} files analysed in {:?}", len, start.elapsed());
}

#[test]
fn test_layered_impact_distances() {
    let (layers, width) = (6, 40);
    let repo = generate_layered_repository(layers, width);
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();
    assert_eq!(graph.nodes.len(), layers * width);
    assert_eq!(graph.edges.len(), (layers - 1) * width * 2);
    assert!(find_cycles(&graph).unwrap().is_empty());

    let index = ImpactIndex::new(&graph).unwrap();
    let bottom = index.impact_of(&layered_path(layers - 1, 0)).unwrap();
    for (path, hops) in &bottom.dependents {
        let layer: usize = path["layer".len()..path.find('/').unwrap()].parse().unwrap();
        assert_eq!(*hops, layers - 1 - layer, "{}", path);
    }

    let nearby = index.impact_within(&layered_path(layers - 1, 0), 1).unwrap();
    assert_eq!(nearby.len(), 2);
}

#[test]
fn test_parallel_impact_matches_sequential() {
    let repo = generate_layered_repository(5, 30);
    let graph = build_graph(&repo, &ResolverConfig::default()).unwrap();

    let start = Instant::now();
    let parallel = impact_of_all(&graph, Some(4)).unwrap();
    println!("impact of {} files in {:?}", graph.nodes.len(), start.elapsed());

    assert_eq!(parallel.len(), graph.nodes.len());
    for (node, impact) in graph.nodes.iter().zip(&parallel) {
        assert_eq!(&impact.target, node);
        assert_eq!(impact.dependents, impact_of(&graph, node).unwrap());
    }
}
