/// Diagram construction rules shared by the generation prompt and the MCP
/// server instructions.
pub const RULES: &str = "\
1. Use only components from the catalog. `data.label` is the component name exactly as listed \
and `data.iconName` is the icon listed next to it. Do not invent components; pick the closest \
catalog entry and describe the specifics in `data.properties`.\n\
2. Every node has `type: \"custom\"`, a unique `id` (\"node-1\", \"node-2\", ...) and a \
`properties.name` that starts out equal to the label. Add a second property only when it carries \
a real design decision (engine, replication, TTL, partition key).\n\
3. Every edge has a unique `id` (\"edge-1\", \"edge-2\", ...) and its `source` and `target` \
must be ids of nodes in the same diagram. Edges that point at nodes you did not emit are invalid.\n\
4. Arrow direction = request direction. The edge points from the caller toward the component it \
depends on (e.g. \"Web Client\" → \"Load Balancer\" → \"Web Server\" → \"Database\").\n\
5. One edge per relationship. Do not add return or response edges. Label the edge with what \
flows over it (\"HTTPS\", \"publishes events\", \"cache lookup\").\n\
6. Clients never talk to data stores directly. Put a server, gateway or function between a \
client and any database, cache or storage bucket.\n\
7. Asynchronous work is explicit. If something is processed later, model the queue or stream \
and the worker that consumes it rather than labelling an edge \"async\".\n\
8. Lay the diagram out left to right in request order. Space nodes about 250 units apart \
horizontally and 150 units vertically; keep all coordinates finite and non-negative.\n\
9. Prefer the smallest design that meets the requirements. Add caches, replicas, CDNs and \
queues only when a stated requirement (latency, scale, durability, availability) calls for them.";
