//! Routing property-based tests
//!
//! Property-based tests for table ordering and for the URL round trip:
//! a URL built for a target resolves back to that target and parameters.

use indexmap::IndexMap;
use proptest::prelude::*;
use railyard_core::RouteRequest;
use railyard_urls::{ControllerRoutes, ParamType, Router, RoutingTables, UrlParams, url_params};
use std::sync::Arc;

fn resolve(router: &Router, url: &str) -> (String, String, IndexMap<String, String>) {
	let request = RouteRequest::builder().uri(url).build().unwrap();
	let session = router.process(request);
	let params = session
		.params()
		.iter()
		.filter(|(key, _)| !key.starts_with('_'))
		.map(|(k, v)| (k.clone(), v.clone()))
		.collect();
	(
		session.module().to_string(),
		session.controller().to_string(),
		params,
	)
}

fn blog_router() -> Router {
	Router::new(Arc::new(RoutingTables::from_controllers(vec![
		ControllerRoutes::new("blog", "read")
			.route("/blog/{$id}/{$page?}")
			.param("id", ParamType::Int)
			.param("page", ParamType::Int),
		ControllerRoutes::new("users", "profile")
			.route("/~{$login}")
			.param("login", ParamType::Text),
		ControllerRoutes::new("wiki", "page").route("/wiki/{$title}"),
		ControllerRoutes::new("files", "raw").route("/files/(.*)"),
	])))
}

// ============================================================================
// Property-Based Tests: Table Ordering
// ============================================================================

proptest! {
	/// Test: static routes precede dynamic routes
	///
	/// Category: Property
	/// Statics come first in reverse discovery order, dynamics follow in
	/// discovery order.
	#[test]
	fn prop_static_dynamic_partition(kinds in prop::collection::vec(any::<bool>(), 0..24)) {
		let controllers: Vec<ControllerRoutes> = kinds
			.iter()
			.enumerate()
			.map(|(i, is_static)| {
				let template = if *is_static {
					format!("/s{}", i)
				} else {
					format!("/d{}/{{$id}}", i)
				};
				ControllerRoutes::new("m", format!("c{}", i)).route(template)
			})
			.collect();

		let tables = RoutingTables::from_controllers(controllers);
		let order: Vec<(bool, usize)> = tables
			.forward()
			.iter()
			.map(|entry| {
				let index = entry.controller()[1..].parse::<usize>().unwrap();
				(entry.is_static(), index)
			})
			.collect();

		let mut expected: Vec<(bool, usize)> = kinds
			.iter()
			.enumerate()
			.filter(|(_, is_static)| **is_static)
			.map(|(i, _)| (true, i))
			.rev()
			.collect();
		expected.extend(
			kinds
				.iter()
				.enumerate()
				.filter(|(_, is_static)| !**is_static)
				.map(|(i, _)| (false, i)),
		);

		prop_assert_eq!(order, expected);
	}
}

// ============================================================================
// Property-Based Tests: Round Trip
// ============================================================================

proptest! {
	/// Test: positional URLs round-trip arbitrary values
	///
	/// Category: Property
	/// Verifies that values survive percent-encoding in path segments.
	#[test]
	fn prop_positional_roundtrip(
		module in "[a-z][a-z0-9]{0,8}",
		controller in "[a-z][a-z0-9]{0,8}",
		params in prop::collection::btree_map("[a-z][a-z0-9_]{0,6}", "\\PC{1,12}", 0..5),
	) {
		let router = Router::new(Arc::new(RoutingTables::empty()));
		let url_params: UrlParams = params
			.iter()
			.map(|(k, v)| (k.clone(), v.as_str().into()))
			.collect();

		let url = router.url(&module, &controller, &url_params).unwrap();
		let (resolved_module, resolved_controller, resolved_params) = resolve(&router, &url);

		prop_assert_eq!(resolved_module, module);
		prop_assert_eq!(resolved_controller, controller);
		let expected: IndexMap<String, String> = params.into_iter().collect();
		prop_assert_eq!(resolved_params, expected);
	}

	/// Test: template URLs round-trip typed values
	///
	/// Category: Property
	/// Placeholder values come back from the path, the rest from the query.
	#[test]
	fn prop_template_roundtrip(
		id in 0u32..100_000,
		page in proptest::option::of(1u32..500),
		sort in proptest::option::of("[a-z ]{1,10}"),
	) {
		let router = blog_router();
		let mut params = url_params! { "id" => id };
		if let Some(page) = page {
			params.insert("page".to_string(), page.into());
		}
		if let Some(sort) = &sort {
			params.insert("sort".to_string(), sort.as_str().into());
		}

		let url = router.url("blog", "read", &params).unwrap();
		prop_assert!(!url.contains("//"));

		let (module, controller, resolved) = resolve(&router, &url);
		prop_assert_eq!(module, "blog");
		prop_assert_eq!(controller, "read");
		let id_string = id.to_string();
		prop_assert_eq!(resolved.get("id").map(String::as_str), Some(id_string.as_str()));
		prop_assert_eq!(resolved.get("page").cloned(), page.map(|p| p.to_string()));
		prop_assert_eq!(resolved.get("sort"), sort.as_ref());
	}

	/// Test: text placeholders round-trip arbitrary values
	///
	/// Category: Property
	/// Percent-encoded values still match the typed and untyped capture
	/// classes and come back decoded.
	#[test]
	fn prop_text_placeholder_roundtrip(value in "\\PC{1,16}") {
		let router = blog_router();

		for (module, controller, key) in [("users", "profile", "login"), ("wiki", "page", "title")] {
			let url = router
				.url(module, controller, &url_params! { key => value.as_str() })
				.unwrap();
			let (resolved_module, resolved_controller, resolved) = resolve(&router, &url);

			prop_assert_eq!(resolved_module, module);
			prop_assert_eq!(resolved_controller, controller);
			prop_assert_eq!(resolved.get(key), Some(&value));
		}
	}

	/// Test: wildcard templates round-trip
	///
	/// Category: Property
	/// The generated URL ends with the slash before the dropped wildcard and
	/// still resolves to the wildcard route.
	#[test]
	fn prop_wildcard_roundtrip(name in proptest::option::of("\\PC{1,12}")) {
		let router = blog_router();
		let mut params = UrlParams::new();
		if let Some(name) = &name {
			params.insert("name".to_string(), name.as_str().into());
		}

		let url = router.url("files", "raw", &params).unwrap();
		prop_assert!(url.starts_with("/files/"));

		let (module, controller, resolved) = resolve(&router, &url);
		prop_assert_eq!(module, "files");
		prop_assert_eq!(controller, "raw");
		prop_assert_eq!(resolved.get("name"), name.as_ref());
	}
}
