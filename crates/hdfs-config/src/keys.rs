//! Low-level configuration keys understood by the HDFS client and the
//! Hadoop output formats.

// Network topology
pub const NET_TOPOLOGY_NODE_SWITCH_MAPPING_IMPL: &str = "net.topology.node.switch.mapping.impl";

// RPC transport
pub const HADOOP_RPC_SOCKET_FACTORY_CLASS_DEFAULT: &str = "hadoop.rpc.socket.factory.class.default";
pub const HADOOP_SOCKS_SERVER: &str = "hadoop.socks.server";
pub const HADOOP_RPC_PROTECTION: &str = "hadoop.rpc.protection";
pub const IPC_PING_INTERVAL: &str = "ipc.ping.interval";
pub const IPC_CLIENT_CONNECT_TIMEOUT: &str = "ipc.client.connect.timeout";
pub const IPC_CLIENT_CONNECT_MAX_RETRIES: &str = "ipc.client.connect.max.retries";

/// Socket factory that tunnels RPC connections through `hadoop.socks.server`
pub const SOCKS_SOCKET_FACTORY_CLASS: &str = "org.apache.hadoop.net.SocksSocketFactory";

/// Quality of protection that encrypts RPC payloads
pub const RPC_PROTECTION_PRIVACY: &str = "privacy";

// DFS client
pub const DFS_CLIENT_SOCKET_TIMEOUT: &str = "dfs.client.socket-timeout";
pub const DFS_DOMAIN_SOCKET_PATH: &str = "dfs.domain.socket.path";
pub const DFS_CLIENT_READ_SHORTCIRCUIT: &str = "dfs.client.read.shortcircuit";
pub const DFS_CLIENT_KEY_PROVIDER_CACHE_EXPIRY_MS: &str = "dfs.client.key.provider.cache.expiry";
pub const DFS_ENCRYPT_DATA_TRANSFER: &str = "dfs.encrypt.data.transfer";
pub const FS_CACHE_MAX_SIZE: &str = "fs.cache.max-size";

// Input formats
pub const LINE_RECORD_READER_MAX_LINE_LENGTH: &str =
    "mapreduce.input.linerecordreader.line.maxlength";

// Output compression
pub const HIVE_COMPRESS_RESULT: &str = "hive.exec.compress.output";
pub const MAPRED_OUTPUT_COMPRESS: &str = "mapred.output.compress";
pub const MAPRED_OUTPUT_COMPRESSION_CODEC: &str = "mapred.output.compression.codec";
pub const OUTPUT_FORMAT_COMPRESS: &str = "mapreduce.output.fileoutputformat.compress";
pub const OUTPUT_FORMAT_COMPRESS_CODEC: &str = "mapreduce.output.fileoutputformat.compress.codec";
pub const OUTPUT_FORMAT_COMPRESS_TYPE: &str = "mapreduce.output.fileoutputformat.compress.type";
pub const ORC_COMPRESS: &str = "orc.compress";
pub const PARQUET_COMPRESSION: &str = "parquet.compression";

/// SequenceFile compression granularity
pub const SEQUENCE_FILE_BLOCK: &str = "BLOCK";
