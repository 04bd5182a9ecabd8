//! # 引擎契约测试
//!
//! ## 覆盖范围（What）
//! - 组合顺序与恒等基例：空清单恒等返回，首个管道最先接触载荷；
//! - 清单编辑：整体替换、追加、按同一性锚点拼接、失败时清单保持原状;
//! - 命名条目与解析器协作：受理期校验、执行前解析、解析错误原样穿透；
//! - 终止信号在最近一层 `process` 边界被吸收，信号之后的管道不再执行。

use std::collections::BTreeMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use manifold_core::{
    ArcPipe, Flow, Next, Pipe, PipeEntry, PipeResolver, PipeResult, Pipeline, PipelineError,
    TransformPipe, arc_pipe, codes, pipe_fn,
};

fn add_one() -> ArcPipe<i64> {
    arc_pipe(TransformPipe::labeled("add-one", |payload: i64| payload + 1))
}

fn double() -> ArcPipe<i64> {
    arc_pipe(TransformPipe::labeled("double", |payload: i64| payload * 2))
}

fn negate() -> ArcPipe<i64> {
    arc_pipe(TransformPipe::labeled("negate", |payload: i64| -payload))
}

fn echo(payload: i64, next: Next<'_, i64>) -> PipeResult<i64> {
    next.run(payload)
}

fn stop(payload: i64, _next: Next<'_, i64>) -> PipeResult<i64> {
    Ok(Flow::Stop(payload))
}

fn failing(_payload: i64, _next: Next<'_, i64>) -> PipeResult<i64> {
    Err(PipelineError::new("demo.step.failure", "boom"))
}

/// 命中计数探针，验证某个位置的管道是否真的被执行过。
struct ProbePipe {
    hits: Arc<AtomicUsize>,
}

impl Pipe<i64> for ProbePipe {
    fn handle(&self, payload: i64, next: Next<'_, i64>) -> PipeResult<i64> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        next.run(payload)
    }
}

fn probe() -> (ArcPipe<i64>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let pipe = arc_pipe(ProbePipe {
        hits: Arc::clone(&hits),
    });
    (pipe, hits)
}

struct MapResolver {
    pipes: BTreeMap<String, ArcPipe<i64>>,
}

impl PipeResolver<i64> for MapResolver {
    fn resolve(&self, id: &str) -> Result<ArcPipe<i64>, PipelineError> {
        self.pipes.get(id).cloned().ok_or_else(|| {
            PipelineError::new(
                "registry.pipe.unknown",
                format!("no pipe registered under `{id}`"),
            )
        })
    }
}

fn registry() -> Arc<MapResolver> {
    let mut pipes = BTreeMap::new();
    pipes.insert(String::from("add-one"), add_one());
    pipes.insert(String::from("double"), double());
    Arc::new(MapResolver { pipes })
}

#[test]
fn empty_pipeline_returns_payload_unchanged() {
    let pipeline = Pipeline::<i64>::new();
    assert_eq!(pipeline.process(42).unwrap(), 42);
}

#[test]
fn pipes_run_in_insertion_order() {
    fn push(letter: char) -> ArcPipe<String> {
        arc_pipe(TransformPipe::new(move |mut text: String| {
            text.push(letter);
            text
        }))
    }

    let pipeline = Pipeline::of([push('a'), push('b')]);
    assert_eq!(pipeline.process(String::new()).unwrap(), "ab");
}

#[test]
fn transform_chain_composes_left_to_right() {
    let pipeline = Pipeline::of([add_one(), double()]);
    assert_eq!(pipeline.process(3).unwrap(), 8);
}

/// 回声管道在任意位置插入都不改变结果。
#[test]
fn echo_pipe_is_noop_at_every_position() {
    let base = Pipeline::of([add_one(), double()]);
    let expected = base.process(3).unwrap();

    for position in 0..=2 {
        let mut pipes = vec![add_one(), double()];
        pipes.insert(position, arc_pipe(pipe_fn(echo)));
        let with_echo = Pipeline::of(pipes);
        assert_eq!(with_echo.process(3).unwrap(), expected);
    }
}

#[test]
fn append_and_prepend_preserve_relative_order() {
    let mut pipeline = Pipeline::of([double()]);

    pipeline.prepend([PipeEntry::from(add_one())]).unwrap();
    assert_eq!(pipeline.process(3).unwrap(), 8);

    pipeline.append([PipeEntry::from(negate())]).unwrap();
    assert_eq!(pipeline.process(3).unwrap(), -8);
}

#[test]
fn via_replaces_the_whole_list() {
    let mut pipeline = Pipeline::of([add_one()]);
    pipeline
        .via([PipeEntry::from(double()), PipeEntry::from(negate())])
        .unwrap();

    assert_eq!(pipeline.len(), 2);
    assert_eq!(pipeline.process(4).unwrap(), -8);
}

#[test]
fn insert_before_splices_adjacent_to_anchor() {
    let first = add_one();
    let last = negate();
    let mut pipeline = Pipeline::of([Arc::clone(&first), Arc::clone(&last)]);

    let anchor = PipeEntry::from(Arc::clone(&last));
    pipeline
        .insert_before(&anchor, [PipeEntry::from(double())])
        .unwrap();

    assert_eq!(pipeline.len(), 3);
    // 3 -> 4 -> 8 -> -8
    assert_eq!(pipeline.process(3).unwrap(), -8);
}

#[test]
fn insert_after_splices_adjacent_to_anchor() {
    let first = add_one();
    let mut pipeline = Pipeline::of([Arc::clone(&first), negate()]);

    let anchor = PipeEntry::from(Arc::clone(&first));
    pipeline
        .insert_after(&anchor, [PipeEntry::from(double())])
        .unwrap();

    // 3 -> 4 -> 8 -> -8
    assert_eq!(pipeline.process(3).unwrap(), -8);
}

/// 两个结构相同的管道实例必须保持可区分：锚点是同一性而非相等性。
#[test]
fn identity_anchors_distinguish_structural_twins() {
    let twin_a = add_one();
    let twin_b = add_one();
    let mut pipeline = Pipeline::of([Arc::clone(&twin_a), Arc::clone(&twin_b)]);

    pipeline
        .insert_after(&PipeEntry::from(Arc::clone(&twin_b)), [PipeEntry::from(double())])
        .unwrap();

    // 0 -> 1 -> 2 -> 4；若误挂在第一个孪生实例之后则得到 3。
    assert_eq!(pipeline.process(0).unwrap(), 4);
}

#[test]
fn missing_anchor_fails_and_leaves_list_untouched() {
    let mut pipeline = Pipeline::of([add_one()]);
    let detached = PipeEntry::from(double());

    let err = pipeline
        .insert_before(&detached, [PipeEntry::from(negate())])
        .unwrap_err();

    assert!(err.is(codes::ANCHOR_MISSING));
    assert_eq!(pipeline.len(), 1);
    assert_eq!(pipeline.process(1).unwrap(), 2);
}

#[test]
fn named_entry_without_resolver_rejected_at_insertion() {
    let mut pipeline = Pipeline::<i64>::new();
    let err = pipeline.via([PipeEntry::named("add-one")]).unwrap_err();

    assert!(err.is(codes::PIPES_INVALID));
    assert!(pipeline.is_empty());
}

#[test]
fn resolver_resolves_named_entries_before_composition() {
    let mut pipeline = Pipeline::with_resolver(registry());
    pipeline
        .via([PipeEntry::named("add-one"), PipeEntry::from(double())])
        .unwrap();

    assert_eq!(pipeline.process(3).unwrap(), 8);
}

#[test]
fn resolver_failure_propagates_unmodified() {
    let mut pipeline = Pipeline::with_resolver(registry());
    pipeline.via([PipeEntry::named("missing")]).unwrap();

    let err = pipeline.process(1).unwrap_err();
    assert!(err.is("registry.pipe.unknown"));
    assert_eq!(err.message(), "no pipe registered under `missing`");
}

/// 终止信号在本引擎边界被吸收：携带载荷即返回值，其后的管道不再执行。
#[test]
fn termination_signal_absorbed_at_nearest_boundary() {
    let (probe_pipe, hits) = probe();
    let pipeline = Pipeline::of([add_one(), arc_pipe(pipe_fn(stop)), probe_pipe]);

    assert_eq!(pipeline.process(3).unwrap(), 4);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[test]
fn pipe_error_propagates_unmodified() {
    let pipeline = Pipeline::of([add_one(), arc_pipe(pipe_fn(failing))]);

    let err = pipeline.process(1).unwrap_err();
    assert!(err.is("demo.step.failure"));
    assert_eq!(err.message(), "boom");
}

#[test]
fn pipeline_is_reusable_across_calls() {
    let pipeline = Pipeline::of([add_one(), double()]);
    assert_eq!(pipeline.process(3).unwrap(), 8);
    assert_eq!(pipeline.process(10).unwrap(), 22);
}

/// 嵌套引擎在外层 `handle` 内同步跑完，外层链路随后继续。
#[test]
fn nested_engine_runs_to_completion_inline() {
    struct NestedPipe {
        inner: Pipeline<i64>,
    }

    impl Pipe<i64> for NestedPipe {
        fn handle(&self, payload: i64, next: Next<'_, i64>) -> PipeResult<i64> {
            let payload = self.inner.process(payload)?;
            next.run(payload)
        }
    }

    let inner = Pipeline::of([double(), add_one()]);
    let pipeline = Pipeline::of([add_one(), arc_pipe(NestedPipe { inner }), negate()]);

    // 3 -> 4 -> (4 * 2 + 1) -> -9
    assert_eq!(pipeline.process(3).unwrap(), -9);
}

#[test]
fn clear_empties_the_list() {
    let mut pipeline = Pipeline::of([add_one()]);
    pipeline.clear();

    assert!(pipeline.is_empty());
    assert_eq!(pipeline.process(5).unwrap(), 5);
}

#[test]
fn shared_pipeline_serves_overlapping_calls() {
    let pipeline = Arc::new(Pipeline::of([add_one(), double()]));

    let handles: Vec<_> = (0..4_i64)
        .map(|seed| {
            let pipeline = Arc::clone(&pipeline);
            std::thread::spawn(move || pipeline.process(seed).unwrap())
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (index as i64 + 1) * 2);
    }
}
