use covault_core::foundation::Address;
use covault_core::infrastructure::chain::{CallDescriptor, ChainClient, MockChainClient};

#[test]
fn transfer_call_exposes_module_function_and_args() {
    let client = MockChainClient::new();
    let call = client.compose_transfer_call(&Address::new("cvdest"), 100).unwrap();
    assert_eq!(call.call_module, "Balances");
    assert_eq!(call.call_function, "transfer_allow_death");
    assert_eq!(call.call_args.get("dest").map(String::as_str), Some("cvdest"));
    assert_eq!(call.call_args.get("value").map(String::as_str), Some("100"));
}

#[test]
fn equal_calls_hash_identically_distinct_calls_do_not() {
    let client = MockChainClient::new();
    let a = client.compose_transfer_call(&Address::new("cvdest"), 100).unwrap();
    let b = client.compose_transfer_call(&Address::new("cvdest"), 100).unwrap();
    let c = client.compose_transfer_call(&Address::new("cvdest"), 101).unwrap();
    assert_eq!(client.hash_call(&a).unwrap(), client.hash_call(&b).unwrap());
    assert_ne!(client.hash_call(&a).unwrap(), client.hash_call(&c).unwrap());
}

#[test]
fn canonical_bytes_round_trip_through_serde() {
    let call = CallDescriptor::new("Multisig", "approve_as_multi").arg("threshold", "2");
    let bytes = call.canonical_bytes().unwrap();
    let decoded: CallDescriptor = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded, call);
}
