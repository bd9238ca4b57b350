//! Dispatcher behavior: ordered first-match per method group, 404 fallback and
//! the middleware pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use maskrouter::dispatcher::{Dispatcher, Outcome};
use maskrouter::method::{MethodFlag, MethodSet};
use maskrouter::middleware::{Flow, Middleware};
use maskrouter::server::{Request, Response};

fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn(&mut Request, &mut Response) + Send + Sync>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_for_handlers = Arc::clone(&log);
    let make = move |name: &'static str| {
        let log = Arc::clone(&log_for_handlers);
        Box::new(move |_: &mut Request, _: &mut Response| {
            log.lock().unwrap().push(name);
        }) as Box<dyn Fn(&mut Request, &mut Response) + Send + Sync>
    };
    (log, make)
}

#[test]
fn test_first_match_within_group_wins() {
    let (log, handler) = recorder();
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(MethodFlag::Get, "/user/{id}", handler("param"))
        .unwrap();
    dispatcher
        .register(MethodFlag::Get, "/user/list", handler("literal"))
        .unwrap();

    let mut req = Request::new(MethodFlag::Get, "/user/list");
    let mut res = Response::new();
    let outcome = dispatcher.dispatch(&mut req, &mut res);
    assert!(outcome.is_matched());
    assert_eq!(*log.lock().unwrap(), vec!["param"]);
    assert_eq!(req.param("id"), Some("list"));
}

#[test]
fn test_later_groups_are_still_tried() {
    let (log, handler) = recorder();
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(MethodFlag::Get, "/item/{id}", handler("get"))
        .unwrap();
    dispatcher
        .register(MethodFlag::Get | MethodFlag::Post, "/item/{sku}", handler("get_post"))
        .unwrap();

    let mut req = Request::new(MethodFlag::Get, "/item/9");
    let mut res = Response::new();
    match dispatcher.dispatch(&mut req, &mut res) {
        Outcome::Matched {
            params,
            handlers_invoked,
        } => {
            assert_eq!(handlers_invoked, 2);
            assert_eq!(params.len(), 2);
        }
        Outcome::NotFound => panic!("expected a match"),
    }
    assert_eq!(*log.lock().unwrap(), vec!["get", "get_post"]);
    assert_eq!(req.param("id"), Some("9"));
    assert_eq!(req.param("sku"), Some("9"));

    log.lock().unwrap().clear();
    let mut req = Request::new(MethodFlag::Post, "/item/9");
    let mut res = Response::new();
    dispatcher.dispatch(&mut req, &mut res);
    assert_eq!(*log.lock().unwrap(), vec!["get_post"]);
}

#[test]
fn test_no_match_sets_404() {
    let (log, handler) = recorder();
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(MethodFlag::Post, "/user/{id}", handler("post"))
        .unwrap();

    let mut req = Request::new(MethodFlag::Get, "/user/1");
    let mut res = Response::new();
    assert_eq!(dispatcher.dispatch(&mut req, &mut res), Outcome::NotFound);
    assert_eq!(res.status(), 404);
    assert!(log.lock().unwrap().is_empty());

    let mut req = Request::new(MethodFlag::Post, "/nowhere");
    let mut res = Response::new();
    assert_eq!(dispatcher.dispatch(&mut req, &mut res), Outcome::NotFound);
}

#[test]
fn test_empty_table_is_404() {
    let dispatcher = Dispatcher::new();
    let mut req = Request::new(MethodFlag::Get, "/");
    let mut res = Response::new();
    assert_eq!(dispatcher.dispatch(&mut req, &mut res), Outcome::NotFound);
    assert_eq!(res.status(), 404);
}

#[test]
fn test_handler_status_is_kept() {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(MethodFlag::Delete, "/user/{id}", |_, res| {
            res.set_status(204);
        })
        .unwrap();
    let mut req = Request::new(MethodFlag::Delete, "/user/3");
    let res = dispatcher.handle(&mut req);
    assert_eq!(res.status(), 204);
}

#[test]
fn test_reregistration_replaces_handler() {
    let (log, handler) = recorder();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(MethodFlag::Get, "/a", handler("first")).unwrap();
    dispatcher.register(MethodFlag::Get, "/a", handler("second")).unwrap();
    assert_eq!(dispatcher.table().len(), 1);

    let mut req = Request::new(MethodFlag::Get, "/a");
    let mut res = Response::new();
    dispatcher.dispatch(&mut req, &mut res);
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}

struct ShortCircuit {
    before_calls: AtomicUsize,
    after_allowed: Mutex<Option<MethodSet>>,
}

impl Middleware for ShortCircuit {
    fn before(&self, req: &Request, res: &mut Response) -> Flow {
        self.before_calls.fetch_add(1, Ordering::SeqCst);
        if req.path == "/blocked" {
            res.set_status(418);
            return Flow::Handled;
        }
        Flow::Continue
    }

    fn after(&self, _req: &Request, _res: &mut Response, allowed: MethodSet, _latency: Duration) {
        *self.after_allowed.lock().unwrap() = Some(allowed);
    }
}

#[test]
fn test_handled_middleware_skips_dispatch() {
    let (log, handler) = recorder();
    let mw = Arc::new(ShortCircuit {
        before_calls: AtomicUsize::new(0),
        after_allowed: Mutex::new(None),
    });
    let mut dispatcher = Dispatcher::new();
    dispatcher.add_middleware(Arc::clone(&mw) as Arc<dyn Middleware>);
    dispatcher
        .register(MethodFlag::Get | MethodFlag::Patch, "/{any}", handler("any"))
        .unwrap();

    let mut req = Request::new(MethodFlag::Get, "/blocked");
    let res = dispatcher.handle(&mut req);
    assert_eq!(res.status(), 418);
    assert!(log.lock().unwrap().is_empty());
    assert_eq!(
        *mw.after_allowed.lock().unwrap(),
        Some(MethodFlag::Get | MethodFlag::Patch)
    );

    let mut req = Request::new(MethodFlag::Get, "/open");
    let res = dispatcher.handle(&mut req);
    assert_eq!(res.status(), 200);
    assert_eq!(*log.lock().unwrap(), vec!["any"]);
    assert_eq!(mw.before_calls.load(Ordering::SeqCst), 2);
}
