use serde_json::json;

use crate::server::{Request, Response};

/// Handler that answers with a JSON description of the request it received.
pub fn echo_handler(req: &mut Request, res: &mut Response) {
    let body = json!({
        "method": req.method.as_str(),
        "path": req.path,
        "params": req.params_map(),
        "query": req.query_params,
    });
    res.set_content_type("application/json");
    res.set_body(Some(body.to_string()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::MethodFlag;

    #[test]
    fn test_echo_body() {
        let mut req = Request::new(MethodFlag::Get, "/user/7").with_query("verbose=1");
        req.insert_param("id", "7");
        let mut res = Response::new();
        echo_handler(&mut req, &mut res);

        assert_eq!(res.content_type(), "application/json");
        let body: serde_json::Value = serde_json::from_str(res.body().unwrap()).unwrap();
        assert_eq!(body["method"], "GET");
        assert_eq!(body["path"], "/user/7");
        assert_eq!(body["params"]["id"], "7");
        assert_eq!(body["query"]["verbose"], "1");
    }
}
