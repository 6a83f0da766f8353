use super::{AutowireRegistry, CONSTRUCTOR};
use crate::arguments::Arguments;
use crate::error::{BoxError, WireError};
use crate::produced::{ArgPack, Autowirable, ProducedType};
use crate::target::{Side, Target, TypeKey};

struct Service {
	route: String,
}

impl Autowirable for Service {
	type Args = String;

	fn autowire(route: Self::Args) -> Result<Self, BoxError> {
		Ok(Self { route })
	}
}

struct Dao;

#[test]
fn member_records_keep_registration_order() {
	let registry = AutowireRegistry::new();
	let target = Target::instance::<Dao>();
	for member in ["first", "second", "third"] {
		registry
			.register_member(target, member, ProducedType::of::<Service>(), ArgPack::new(String::from("api")))
			.expect("member registers");
	}

	let names: Vec<_> = registry.members_for(target).iter().map(|record| record.member).collect();
	assert_eq!(names, vec!["first", "second", "third"]);
	assert!(registry.members_for(Target::of_type::<Dao>()).is_empty());
}

#[test]
fn parameters_are_filtered_by_method() {
	let registry = AutowireRegistry::new();
	let target = Target::instance::<Dao>();
	let produced = ProducedType::of::<Service>();
	let args = ArgPack::new(String::from("route"));
	registry.register_parameter(target, "fetch", 1, produced, args.clone()).unwrap();
	registry.register_parameter(target, "store", 0, produced, args.clone()).unwrap();
	registry.register_parameter(target, "fetch", 0, produced, args).unwrap();

	let fetch: Vec<_> = registry.parameters_for(target, "fetch").iter().map(|p| p.index).collect();
	assert_eq!(fetch, vec![1, 0]);
	assert_eq!(registry.parameters_for(target, "store").len(), 1);
	assert!(registry.parameters_for(target, "missing").is_empty());
}

#[test]
fn constructor_parameters_use_sentinel_on_static_side() {
	let registry = AutowireRegistry::new();
	let owner = TypeKey::of::<Dao>();
	registry
		.register_constructor_parameter(owner, 2, ProducedType::of::<Service>(), ArgPack::new(String::new()))
		.unwrap();

	let params = registry.constructor_parameters(owner);
	assert_eq!(params.len(), 1);
	assert_eq!(params[0].method, CONSTRUCTOR);
	assert_eq!(params[0].side, Side::Static);
	assert_eq!(params[0].index, 2);
}

#[test]
fn constructor_sentinel_rejected_on_instance_side() {
	let registry = AutowireRegistry::new();
	let err = registry
		.register_parameter(
			Target::instance::<Dao>(),
			CONSTRUCTOR,
			0,
			ProducedType::of::<Service>(),
			ArgPack::new(String::new()),
		)
		.unwrap_err();
	assert!(matches!(err, WireError::ReservedName { .. }));
}

#[test]
fn mismatched_arguments_fail_at_registration() {
	let registry = AutowireRegistry::new();
	let err = registry
		.register_member(Target::instance::<Dao>(), "service", ProducedType::of::<Service>(), ArgPack::new(42u32))
		.unwrap_err();
	assert!(matches!(err, WireError::ArgumentMismatch { .. }), "{err}");
	assert!(registry.members_for(Target::instance::<Dao>()).is_empty());
}

#[test]
fn records_produce_fresh_values() {
	let registry = AutowireRegistry::new();
	let target = Target::instance::<Dao>();
	registry
		.register_member(target, "service", ProducedType::of::<Service>(), ArgPack::new(String::from("svc")))
		.unwrap();

	let record = &registry.members_for(target)[0];
	let first = record.produce().unwrap().downcast::<Service>().unwrap();
	let second = record.produce().unwrap().downcast::<Service>().unwrap();
	assert_eq!(first.route, "svc");
	assert!(!std::ptr::eq(&*first, &*second));
}

#[test]
fn catalog_resolution() {
	let registry = AutowireRegistry::new();
	registry.catalog().register::<Service>();

	let produced = registry.resolve(|| String::from("Dao.service"), "Service").unwrap();
	assert_eq!(produced, ProducedType::of::<Service>());

	let err = registry.resolve(|| String::from("Dao.other"), "Missing").unwrap_err();
	match err {
		WireError::UnresolvedType { site, type_name } => {
			assert_eq!(site, "Dao.other");
			assert_eq!(type_name, "Missing");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn clones_share_records() {
	let registry = AutowireRegistry::new();
	let clone = registry.clone();
	clone
		.register_member(Target::instance::<Dao>(), "service", ProducedType::of::<Service>(), ArgPack::new(String::new()))
		.unwrap();
	assert_eq!(registry.members_for(Target::instance::<Dao>()).len(), 1);
}

#[test]
fn parameter_index_is_bounded() {
	let registry = AutowireRegistry::new();
	let target = Target::instance::<Dao>();
	let produced = ProducedType::of::<Service>();
	let err = registry
		.register_parameter(target, "fetch", Arguments::MAX_INDEX + 1, produced, ArgPack::new(String::new()))
		.unwrap_err();
	assert!(matches!(err, WireError::ArgumentIndex { .. }), "{err}");

	registry
		.register_parameter(target, "fetch", Arguments::MAX_INDEX, produced, ArgPack::new(String::new()))
		.unwrap();
	assert_eq!(registry.parameters_for(target, "fetch").len(), 1);
}
