//! Replacing the process-wide resolver
use config_abstractions::{same_instance, Config, ConfigProviderResolver};
use config_common::OwnerContext;
use config_impl::{ConfigProvider, DefaultConfigProvider};
use std::sync::Arc;

#[test]
fn test_replaced_resolver_serves_the_facade() {
    let ctx = OwnerContext::new("replaced");
    let provider = Arc::new(DefaultConfigProvider::new());
    let expected: Arc<dyn Config> = provider.get_config(Some(&ctx)).unwrap();

    config_impl::set_resolver_instance(provider.clone());

    let via_facade = ConfigProvider::get_config_for(&ctx).unwrap();
    assert!(same_instance(&via_facade, &expected));
    let installed = config_impl::resolver_instance();
    assert!(std::ptr::eq(
        Arc::as_ptr(&installed).cast::<()>(),
        Arc::as_ptr(&provider).cast::<()>()
    ));

    provider.shutdown().unwrap();
}
