//! Generated protobuf/gRPC types for the detect RPC.

tonic::include_proto!("detect");
