// handlers/protected/mod.rs - Handlers behind jwt_auth_middleware
//
// Each handler extracts the `CallerIdentity` the middleware inserted and
// passes it explicitly to the asset service.
pub mod assets;
