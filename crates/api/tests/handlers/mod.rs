mod availability_test;
mod health_test;
mod loyalty_test;
mod middleware_test;
mod policy_test;
mod realtime_test;
