#![cfg(all(feature = "memory-session", feature = "memory-store"))]

use futures::executor::block_on;
use rulegate::{
    Actor, ActorId, ActorSlot, AuthModule, Context, ContextExt, CredentialAuthenticator,
    MemoryActorStore, MemorySession, RuleSet, Session, SessionAuthenticator, signature,
};
use std::any::Any;
use std::collections::HashMap;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

const REPEATS: usize = 5;

fn benchmark_sync<F>(name: &str, iterations: usize, mut op: F)
where
    F: FnMut(),
{
    let mut samples = Vec::with_capacity(REPEATS);

    for _ in 0..REPEATS {
        let start = Instant::now();
        for _ in 0..iterations {
            op();
        }
        samples.push(start.elapsed());
    }

    samples.sort_unstable();
    let median = samples[REPEATS / 2];
    let total_ms = median.as_secs_f64() * 1_000.0;
    let ns_per_op = median.as_secs_f64() * 1_000_000_000.0 / iterations as f64;
    let ops_per_sec = iterations as f64 / median.as_secs_f64();

    println!(
        "{name}: median={total_ms:.3} ms, ns/op={ns_per_op:.1}, ops/s={ops_per_sec:.0} (iters={iterations}, repeats={REPEATS})"
    );
}

fn benchmark_parallel<F>(name: &str, threads: usize, iterations_per_thread: usize, op_factory: F)
where
    F: Fn() -> Box<dyn FnMut() + Send> + Send + Sync + 'static,
{
    let op_factory = Arc::new(op_factory);
    let mut samples = Vec::with_capacity(REPEATS);

    for _ in 0..REPEATS {
        let start = Instant::now();
        let mut joins = Vec::with_capacity(threads);
        for _ in 0..threads {
            let factory = Arc::clone(&op_factory);
            joins.push(std::thread::spawn(move || {
                let mut op = factory();
                for _ in 0..iterations_per_thread {
                    op();
                }
            }));
        }
        for join in joins {
            join.join().expect("thread panicked");
        }
        samples.push(start.elapsed());
    }

    samples.sort_unstable();
    let median = samples[REPEATS / 2];
    let total_ops = threads * iterations_per_thread;
    let total_ms = median.as_secs_f64() * 1_000.0;
    let ns_per_op = median.as_secs_f64() * 1_000_000_000.0 / total_ops as f64;
    let ops_per_sec = total_ops as f64 / median.as_secs_f64();

    println!(
        "{name}: median={total_ms:.3} ms, ns/op={ns_per_op:.1}, ops/s={ops_per_sec:.0} (threads={threads}, total_ops={total_ops}, repeats={REPEATS})"
    );
}

#[derive(Debug)]
struct User {
    id: &'static str,
}

impl Actor for User {
    fn id(&self) -> ActorId {
        ActorId::from_string(self.id.to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Document {
    owner: &'static str,
}

struct RequestContext {
    session: MemorySession,
    slot: ActorSlot,
    form: HashMap<String, String>,
}

impl RequestContext {
    fn new(session: MemorySession) -> Self {
        Self {
            session,
            slot: ActorSlot::new(),
            form: HashMap::new(),
        }
    }

    fn with_login(session: MemorySession, username: &str, password: &str) -> Self {
        let mut ctx = Self::new(session);
        ctx.form
            .insert("username".to_string(), username.to_string());
        ctx.form
            .insert("password".to_string(), password.to_string());
        ctx
    }
}

impl Context for RequestContext {
    fn session(&self) -> &dyn Session {
        &self.session
    }

    fn actor_slot(&self) -> &ActorSlot {
        &self.slot
    }

    fn form_field(&self, name: &str) -> Option<String> {
        self.form.get(name).cloned()
    }
}

fn actor_ctx(id: &'static str) -> RequestContext {
    let ctx = RequestContext::new(MemorySession::new());
    ctx.slot.set(Some(Arc::new(User { id })));
    ctx
}

fn owner_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules
        .register("edit", signature![Document], |ctx, subjects| {
            let Some(doc) = subjects.get::<Document>(0) else {
                return false;
            };
            ctx.actor()
                .is_some_and(|actor| actor.id().as_str() == doc.owner)
        })
        .unwrap();
    rules
}

macro_rules! declare_levels {
    ($($level:ident),+ $(,)?) => {
        $(struct $level;)+
    };
}

macro_rules! link_levels {
    ($rules:ident, $($child:ident => $parent:ident),+ $(,)?) => {
        $($rules.register_subtype::<$child, $parent>(|_| &$parent);)+
    };
}

declare_levels!(D0, D1, D2, D3, D4, D5, D6, D7, D8);

fn deep_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    link_levels!(
        rules,
        D1 => D0, D2 => D1, D3 => D2, D4 => D3,
        D5 => D4, D6 => D5, D7 => D6, D8 => D7,
    );
    rules
        .register("descend", signature![D0], |_ctx, _subjects| true)
        .unwrap();
    rules
}

fn login_module(store: Arc<MemoryActorStore>) -> AuthModule {
    let store_for_login = Arc::clone(&store);
    let store_for_session = store;
    AuthModule::builder()
        .authenticators(vec![
            Box::new(move |next| Box::new(CredentialAuthenticator::new(store_for_login, next))),
            Box::new(move |next| {
                Box::new(SessionAuthenticator::with_store(store_for_session, next))
            }),
        ])
        .build()
        .expect("module")
}

#[test]
#[ignore = "manual performance test; run with --ignored --nocapture"]
fn perf_permits_and_chain() {
    let iterations = 200_000;

    let rules = owner_rules();
    let ctx = actor_ctx("u1");
    let doc = Document { owner: "u1" };
    assert!(rules.permits(&ctx, "edit", &[&doc]));
    benchmark_sync("permits_flat", iterations, || {
        let granted = rules.permits(&ctx, "edit", &[&doc]);
        black_box(granted);
    });

    let rules = deep_rules();
    let ctx = RequestContext::new(MemorySession::new());
    assert!(rules.permits(&ctx, "descend", &[&D8]));
    benchmark_sync("permits_subtype_depth8", iterations / 4, || {
        let granted = rules.permits(&ctx, "descend", &[&D8]);
        black_box(granted);
    });

    let store = Arc::new(MemoryActorStore::new());
    store.add_credentials("ada", "hunter2", Arc::new(User { id: "u1" }));
    let module = login_module(store);
    let session = MemorySession::new();
    let login_ctx = RequestContext::with_login(session.clone(), "ada", "hunter2");
    let warm = block_on(module.actor(&login_ctx)).unwrap();
    assert!(warm.is_some());
    benchmark_sync("chain_session_resolution", iterations / 4, || {
        let ctx = RequestContext::new(session.clone());
        let actor = block_on(module.actor(&ctx)).unwrap();
        black_box(actor.is_some());
    });

    let threads = std::thread::available_parallelism()
        .map(|n| n.get().min(8))
        .unwrap_or(4);
    let iterations_per_thread = 50_000;

    let rules = Arc::new(owner_rules());
    benchmark_parallel(
        "permits_flat_parallel",
        threads,
        iterations_per_thread,
        move || {
            let rules = Arc::clone(&rules);
            let ctx = actor_ctx("u1");
            Box::new(move || {
                let doc = Document { owner: "u1" };
                let granted = rules.permits(&ctx, "edit", &[&doc]);
                black_box(granted);
            })
        },
    );
}
