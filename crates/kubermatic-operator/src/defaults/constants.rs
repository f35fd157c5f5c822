//! Built-in defaults of the [`KubermaticConfiguration`](crate::crd::KubermaticConfiguration).

use crate::commons::resources::{ComputeResources, ResourceDefaults};

pub const DEFAULT_PPROF_ENDPOINT: &str = ":6600";
pub const DEFAULT_NODE_PORT_RANGE: &str = "30000-32767";
pub const DEFAULT_ETCD_VOLUME_SIZE: &str = "5Gi";
pub const DEFAULT_AUTH_CLIENT_ID: &str = "kubermatic";

// cert-manager defaults to Issuer, but the operator never creates one.
pub const DEFAULT_CERTIFICATE_ISSUER_KIND: &str = "ClusterIssuer";

pub const DEFAULT_KUBERMATIC_IMAGE: &str = "quay.io/kubermatic/kubermatic";
pub const DEFAULT_DASHBOARD_IMAGE: &str = "quay.io/kubermatic/dashboard-v2";
pub const DEFAULT_DNAT_CONTROLLER_IMAGE: &str = "quay.io/kubermatic/kubeletdnat-controller";
pub const DEFAULT_KUBERNETES_ADDON_IMAGE: &str = "quay.io/kubermatic/addons";
pub const DEFAULT_OPENSHIFT_ADDON_IMAGE: &str = "quay.io/kubermatic/openshift-addons";

pub const DEFAULT_KUBERNETES_ADDONS: &[&str] = &[
    "canal",
    "csi",
    "dns",
    "kube-proxy",
    "openvpn",
    "rbac",
    "kubelet-configmap",
    "default-storage-class",
    "nodelocal-dns-cache",
    "pod-security-policy",
    "logrotate",
];

pub const DEFAULT_ACCESSIBLE_ADDONS: &[&str] = &["node-exporter"];

pub const DEFAULT_UI_RESOURCES: ResourceDefaults = ResourceDefaults {
    requests: ComputeResources {
        cpu: "100m",
        memory: "64Mi",
    },
    limits: ComputeResources {
        cpu: "250m",
        memory: "128Mi",
    },
};

pub const DEFAULT_API_RESOURCES: ResourceDefaults = ResourceDefaults {
    requests: ComputeResources {
        cpu: "100m",
        memory: "512Mi",
    },
    limits: ComputeResources {
        cpu: "250m",
        memory: "1Gi",
    },
};

pub const DEFAULT_MASTER_CONTROLLER_RESOURCES: ResourceDefaults = ResourceDefaults {
    requests: ComputeResources {
        cpu: "50m",
        memory: "128Mi",
    },
    limits: ComputeResources {
        cpu: "100m",
        memory: "256Mi",
    },
};

pub const DEFAULT_SEED_CONTROLLER_RESOURCES: ResourceDefaults = ResourceDefaults {
    requests: ComputeResources {
        cpu: "200m",
        memory: "512Mi",
    },
    limits: ComputeResources {
        cpu: "500m",
        memory: "1Gi",
    },
};
