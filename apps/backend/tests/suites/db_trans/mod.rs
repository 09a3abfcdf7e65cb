mod props;
mod savepoint;
